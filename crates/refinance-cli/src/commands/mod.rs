pub mod refinance;
