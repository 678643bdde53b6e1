//! `sample`: print the embedded starter configuration

use labstack_core::sample_config;

pub fn handle() {
    print!("{}", sample_config());
}
