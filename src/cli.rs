pub mod cli_balancer;
pub mod cli_elements;
pub mod cli_main;
pub mod cli_molmass;
