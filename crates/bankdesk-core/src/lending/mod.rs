pub mod amortization;
pub mod comparison;
pub mod loan_quote;
