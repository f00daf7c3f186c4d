use crate::error::{CreditError, Result};
use crate::loan::{
    annuity_payment, monthly_rate, solve_periods, solve_principal, DifferentiatedSchedule,
    Duration, LoanSpec, LoanType,
};
use log::{debug, info, warn};
use std::{fmt, io::Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which input was missing and had to be solved for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnknownField {
    None,
    Principal,
    Periods,
    Payment,
}

/// Inputs after rate derivation and principal/periods resolution.
#[derive(Clone, PartialEq, Debug)]
pub struct Resolved {
    pub rate: f64,
    pub principal: f64,
    pub periods: i64,
    pub payment: Option<f64>,
    pub unknown: UnknownField,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Report {
    Annuity { payment: f64, overpayment: f64 },
    Differentiated(DifferentiatedSchedule),
    Principal { principal: f64, overpayment: f64 },
    Duration { duration: Duration, overpayment: f64 },
    Overpayment { overpayment: f64 },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Annuity {
                payment,
                overpayment,
            } => {
                writeln!(f, "Your annuity payment = {}!", payment)?;
                writeln!(f, "Overpayment = {}", overpayment)
            }
            Report::Differentiated(schedule) => {
                let mut total = 0.;
                for (i, payment) in schedule.payments().enumerate() {
                    writeln!(f, "Month {}: paid out {}", i + 1, payment)?;
                    total += payment;
                }
                writeln!(f, "Overpayment = {}", total - schedule.principal)
            }
            Report::Principal {
                principal,
                overpayment,
            } => {
                writeln!(f, "Your credit principal {}", Amount(*principal))?;
                writeln!(f, "Overpayment {}", Amount(*overpayment))
            }
            Report::Duration {
                duration,
                overpayment,
            } => {
                writeln!(f, "{}", duration)?;
                writeln!(f, "Overpayment {}", Amount(*overpayment))
            }
            Report::Overpayment { overpayment } => {
                writeln!(f, "Overpayment {}", Amount(*overpayment))
            }
        }
    }
}

/// An amount derived from the fixed payment. Whole values keep a trailing
/// `.0` so they read as fractional money, unlike rounded-up payments.
struct Amount(f64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0. {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

pub struct CreditCalculator {
    spec: LoanSpec,
}

impl CreditCalculator {
    pub fn new(spec: LoanSpec) -> Self {
        Self { spec }
    }

    /// Prints the report for this loan to `out`. Invalid inputs print
    /// `Incorrect parameters` instead; only write failures are returned.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.calculate() {
            Ok(report) => write!(out, "{}", report)?,
            Err(CreditError::InvalidParameters { reason }) => {
                warn!("{}: {}", self.spec, reason);
                writeln!(out, "Incorrect parameters")?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    pub fn calculate(&self) -> Result<Report> {
        info!("calculating {}", self.spec);
        let resolved = self.resolve()?;
        debug!("resolved {:?}", resolved);
        dispatch(self.spec.loan_type, &resolved)
    }

    /// Derives the monthly rate, then fills in whichever of principal and
    /// periods is missing.
    pub fn resolve(&self) -> Result<Resolved> {
        let rate = monthly_rate(self.spec.interest)?;
        let (principal, unknown) = resolve_principal(&self.spec, rate)?;
        let (periods, unknown) = resolve_periods(&self.spec, principal, rate, unknown)?;

        let unknown = match (unknown, self.spec.payment) {
            (UnknownField::None, None) => UnknownField::Payment,
            (unknown, _) => unknown,
        };

        Ok(Resolved {
            rate,
            principal,
            periods,
            payment: self.spec.payment,
            unknown,
        })
    }
}

fn resolve_principal(spec: &LoanSpec, rate: f64) -> Result<(f64, UnknownField)> {
    match spec.principal {
        Some(principal) if principal < 0 => Err(CreditError::invalid(format!(
            "principal {} is negative",
            principal
        ))),
        Some(principal) => Ok((principal as f64, UnknownField::None)),
        None => {
            let periods = spec
                .periods
                .ok_or_else(|| CreditError::invalid("principal needs periods"))?;
            let payment = spec
                .payment
                .ok_or_else(|| CreditError::invalid("principal needs payment"))?;
            Ok((
                solve_principal(payment, rate, periods)?,
                UnknownField::Principal,
            ))
        }
    }
}

fn resolve_periods(
    spec: &LoanSpec,
    principal: f64,
    rate: f64,
    unknown: UnknownField,
) -> Result<(i64, UnknownField)> {
    match spec.periods {
        Some(periods) if periods < 0 => Err(CreditError::invalid(format!(
            "periods {} is negative",
            periods
        ))),
        Some(periods) => Ok((periods, unknown)),
        None => {
            let payment = spec
                .payment
                .ok_or_else(|| CreditError::invalid("periods need payment"))?;
            // principal is always known here: a missing one needs periods
            Ok((solve_periods(payment, principal, rate)?, UnknownField::Periods))
        }
    }
}

fn dispatch(loan_type: Option<LoanType>, loan: &Resolved) -> Result<Report> {
    match loan_type {
        Some(LoanType::Annuity) => annuity_report(loan),
        Some(LoanType::Differentiated) => differentiated_report(loan),
        None => Err(CreditError::invalid("loan type is missing or unknown")),
    }
}

fn annuity_report(loan: &Resolved) -> Result<Report> {
    let overpayment = |payment: f64| payment * loan.periods as f64 - loan.principal;

    match (loan.unknown, loan.payment) {
        (UnknownField::Payment, _) | (_, None) => {
            let payment = annuity_payment(loan.principal, loan.rate, loan.periods)?;
            Ok(Report::Annuity {
                payment,
                overpayment: overpayment(payment),
            })
        }
        (UnknownField::Principal, Some(payment)) => Ok(Report::Principal {
            principal: loan.principal,
            overpayment: overpayment(payment),
        }),
        (UnknownField::Periods, Some(payment)) => Ok(Report::Duration {
            duration: Duration::from_periods(loan.periods),
            overpayment: overpayment(payment),
        }),
        (UnknownField::None, Some(payment)) => Ok(Report::Overpayment {
            overpayment: overpayment(payment),
        }),
    }
}

fn differentiated_report(loan: &Resolved) -> Result<Report> {
    // a fixed payment contradicts a differentiated schedule
    if loan.unknown != UnknownField::Payment {
        return Err(CreditError::invalid(
            "differentiated loans need principal and periods and no payment",
        ));
    }

    Ok(Report::Differentiated(DifferentiatedSchedule::new(
        loan.principal,
        loan.rate,
        loan.periods,
    )))
}
