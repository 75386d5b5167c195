pub fn default_service_name() -> String {
    "openmatch".to_string()
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8081
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_depth() -> usize {
    10
}

pub fn default_max_depth() -> usize {
    100
}

pub fn default_trade_history() -> usize {
    1000
}
