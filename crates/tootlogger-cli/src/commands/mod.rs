pub mod accounts;
pub mod run;
