use crate::error::{CreditError, Result};
use log::{debug, trace};
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoanType {
    Annuity,
    Differentiated,
}

impl FromStr for LoanType {
    type Err = CreditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annuity" => Ok(LoanType::Annuity),
            "diff" => Ok(LoanType::Differentiated),
            other => Err(CreditError::invalid(format!("unknown loan type {:?}", other))),
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanType::Annuity => write!(f, "annuity"),
            LoanType::Differentiated => write!(f, "diff"),
        }
    }
}

/// The raw inputs of one calculation. Any field may be missing; which ones are
/// missing decides what gets solved for.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanSpec {
    pub principal: Option<i64>,
    pub periods: Option<i64>,
    pub interest: Option<f64>, // nominal annual rate in percent, i.e. 10 for 10%
    pub payment: Option<f64>,
    pub loan_type: Option<LoanType>,
}

impl LoanSpec {
    pub fn new(
        principal: Option<i64>,
        periods: Option<i64>,
        interest: Option<f64>,
        payment: Option<f64>,
        loan_type: Option<LoanType>,
    ) -> Self {
        Self {
            principal,
            periods,
            interest,
            payment,
            loan_type,
        }
    }
}

impl fmt::Display for LoanSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal {:?}, periods {:?}, interest {:?}%, payment {:?}, type {:?}",
            self.principal, self.periods, self.interest, self.payment, self.loan_type
        )
    }
}

/// Repayment time split into whole years and leftover months.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Duration {
    pub years: i64,
    pub months: i64,
}

impl Duration {
    pub fn from_periods(periods: i64) -> Self {
        let years = periods.div_euclid(12);
        Self {
            years,
            months: periods - years * 12,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // both words follow the year count: 1 year and 2 month
        let (word_years, word_months) = if self.years > 1 {
            ("years", "months")
        } else {
            ("year", "month")
        };

        if self.years > 0 && self.months > 0 {
            write!(
                f,
                "You need {} {} and {} {} to repay this credit!",
                self.years, word_years, self.months, word_months
            )
        } else if self.years > 0 {
            write!(f, "You need {} {} to repay this credit!", self.years, word_years)
        } else {
            write!(f, "You need {} {} to repay this credit!", self.months, word_months)
        }
    }
}

/// Converts a nominal annual percentage into a monthly decimal rate.
pub fn monthly_rate(interest: Option<f64>) -> Result<f64> {
    match interest {
        Some(pct) if pct >= 0. => Ok((pct / 100.) / 12.),
        Some(pct) => Err(CreditError::invalid(format!("interest {} is negative", pct))),
        None => Err(CreditError::invalid("interest is required")),
    }
}

/// Share of the principal paid each month on an annuity loan:
/// i * (1 + i)^n / ((1 + i)^n - 1).
pub fn annuity_factor(rate: f64, periods: i64) -> Result<f64> {
    let factor = (1. + rate).powf(periods as f64);
    let annuity = (rate * factor) / (factor - 1.);

    if annuity.is_finite() && annuity != 0. {
        Ok(annuity)
    } else {
        Err(CreditError::invalid(format!(
            "no annuity factor for rate {} over {} periods",
            rate, periods
        )))
    }
}

/// The principal that a fixed `payment` repays over `periods` months.
pub fn solve_principal(payment: f64, rate: f64, periods: i64) -> Result<f64> {
    let principal = payment / annuity_factor(rate, periods)?;
    debug!("solved principal {} from payment {}", principal, payment);
    Ok(principal)
}

/// Months needed to repay `principal` with a fixed `payment`, rounded up.
pub fn solve_periods(payment: f64, principal: f64, rate: f64) -> Result<i64> {
    let remainder = payment - rate * principal;
    if remainder.is_nan() || remainder <= 0. {
        return Err(CreditError::invalid(format!(
            "payment {} does not cover monthly interest on {}",
            payment, principal
        )));
    }

    // logarithm with base 1 + rate
    let total = (payment / remainder).ln() / (1. + rate).ln();
    if !total.is_finite() {
        return Err(CreditError::invalid(format!(
            "loan of {} never amortizes at rate {}",
            principal, rate
        )));
    }

    let periods = total.ceil() as i64;
    debug!("solved {} periods ({})", periods, total);
    Ok(periods)
}

/// Fixed monthly annuity payment, rounded up to a whole currency unit.
pub fn annuity_payment(principal: f64, rate: f64, periods: i64) -> Result<f64> {
    if periods < 0 {
        return Err(CreditError::invalid(format!("periods {} is negative", periods)));
    }
    Ok((principal * annuity_factor(rate, periods)?).ceil())
}

/// Monthly payments of a differentiated loan. Payments are produced lazily,
/// month 1 first, so long schedules are never held in memory.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DifferentiatedSchedule {
    pub principal: f64,
    pub rate: f64,
    pub periods: i64,
}

impl DifferentiatedSchedule {
    pub fn new(principal: f64, rate: f64, periods: i64) -> Self {
        Self {
            principal,
            rate,
            periods,
        }
    }

    /// Each payment is rounded up on its own.
    pub fn payments(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.periods as f64;

        (1..=self.periods).map(move |month| {
            let paid_off = (self.principal * (month - 1) as f64) / n;
            let payment = (self.principal / n + self.rate * (self.principal - paid_off)).ceil();
            trace!("month {}, paid off {}, payment {}", month, paid_off, payment);
            payment
        })
    }

    pub fn overpayment(&self) -> f64 {
        self.payments().sum::<f64>() - self.principal
    }
}
