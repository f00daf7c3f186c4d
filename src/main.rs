use clap::Parser;
use creditcalc::calculator::CreditCalculator;
use creditcalc::loan::{LoanSpec, LoanType};
use log::debug;
use simple_logger::SimpleLogger;
use std::{error::Error, io};

/// Loan calculator: solves for the missing principal, periods or payment
#[derive(Parser, Debug)]
#[command(name = "creditcalc", version)]
struct Cli {
    /// Amount borrowed
    #[arg(long, allow_negative_numbers = true)]
    principal: Option<i64>,

    /// Number of monthly payments
    #[arg(long, allow_negative_numbers = true)]
    periods: Option<i64>,

    /// Nominal annual interest rate in percent
    #[arg(long, allow_negative_numbers = true)]
    interest: Option<f64>,

    /// Fixed monthly payment
    #[arg(long, allow_negative_numbers = true)]
    payment: Option<f64>,

    /// Loan type: annuity or diff
    #[arg(long = "type")]
    loan_type: Option<String>,
}

impl Cli {
    fn into_spec(self) -> LoanSpec {
        // an unknown type is reported once the calculator dispatches on it
        let loan_type = self.loan_type.and_then(|s| s.parse::<LoanType>().ok());

        LoanSpec::new(
            self.principal,
            self.periods,
            self.interest,
            self.payment,
            loan_type,
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // logs go to stderr so stdout carries only the report
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    let cli = Cli::parse();
    debug!("{:?}", cli);

    let calculator = CreditCalculator::new(cli.into_spec());
    calculator.run(&mut io::stdout().lock())?;
    Ok(())
}
