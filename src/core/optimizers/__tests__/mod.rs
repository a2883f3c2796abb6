mod config_test;
mod gradient_test;
