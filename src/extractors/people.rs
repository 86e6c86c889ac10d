// src/extractors/people.rs
//! Female-representation and pay statistics over the people listed in a filing.

use crate::extractors::fields::{FilingFacts, KeyEmployeeEntry, TrusteeEntry};
use crate::extractors::gender::{Gender, GenderGuesser};
use rand::Rng;

/// Running female/total tally.
#[derive(Debug, Default, Clone, Copy)]
struct GenderCount {
    female: u32,
    total: u32,
}

impl GenderCount {
    fn add(&mut self, gender: Gender) {
        self.total += 1;
        if gender == Gender::Female {
            self.female += 1;
        }
    }

    fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.female as f64 / self.total as f64)
    }
}

/// Trustee names are taken at their first token.
fn trustee_first_name(full_name: &str) -> Option<&str> {
    full_name.split_whitespace().next()
}

/// Schedule J names: "FIRST LAST" uses the first token, anything longer the
/// second, to step over a leading initial or title. A lone token is used as is.
// Not the same rule as `trustee_first_name`.
fn key_employee_first_name(full_name: &str) -> Option<&str> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.len() {
        0 => None,
        1 | 2 => Some(tokens[0]),
        _ => Some(tokens[1]),
    }
}

fn classify_key_employee<R: Rng + ?Sized>(
    entry: &KeyEmployeeEntry,
    guesser: &GenderGuesser,
    rng: &mut R,
) -> Option<Gender> {
    let name = entry.name.as_deref()?;
    let first_name = key_employee_first_name(name)?;
    Some(guesser.guess(first_name, rng))
}

/// Computes the per-filing person statistics. Each statistic draws its own
/// guesses from `rng`.
pub struct PersonGroupStats<'g> {
    guesser: &'g GenderGuesser,
}

impl<'g> PersonGroupStats<'g> {
    pub fn new(guesser: &'g GenderGuesser) -> Self {
        Self { guesser }
    }

    /// Share of women among unpaid individual trustees and directors.
    pub fn trustee_female_percentage<R: Rng + ?Sized>(
        &self,
        trustees: &[TrusteeEntry],
        rng: &mut R,
    ) -> Option<f64> {
        let mut count = GenderCount::default();
        for entry in trustees.iter().filter(|e| e.is_unpaid_trustee()) {
            let Some(first_name) = entry.name.as_deref().and_then(trustee_first_name) else {
                continue;
            };
            count.add(self.guesser.guess(first_name, rng));
        }
        tracing::debug!("Trustees: {} of {} guessed female", count.female, count.total);
        count.ratio()
    }

    /// Share of women among named Schedule J entries. `None` without a Schedule J.
    pub fn key_employee_female_percentage<R: Rng + ?Sized>(
        &self,
        key_employees: Option<&[KeyEmployeeEntry]>,
        rng: &mut R,
    ) -> Option<f64> {
        let mut count = GenderCount::default();
        for entry in key_employees? {
            if let Some(gender) = classify_key_employee(entry, self.guesser, rng) {
                count.add(gender);
            }
        }
        tracing::debug!("Key employees: {} of {} guessed female", count.female, count.total);
        count.ratio()
    }

    /// Total male key-employee pay over total female key-employee pay.
    /// Entries without a usable amount or name are left out.
    pub fn male_to_female_pay_ratio<R: Rng + ?Sized>(
        &self,
        key_employees: Option<&[KeyEmployeeEntry]>,
        rng: &mut R,
    ) -> Option<f64> {
        let mut male_sum = 0.0;
        let mut female_sum = 0.0;
        for entry in key_employees? {
            let Some(pay) = entry.compensation else {
                continue;
            };
            match classify_key_employee(entry, self.guesser, rng) {
                Some(Gender::Male) => male_sum += pay,
                Some(Gender::Female) => female_sum += pay,
                None => {}
            }
        }

        if female_sum > 0.0 {
            Some(male_sum / female_sum)
        } else {
            tracing::debug!("No female key employee pay; male/female ratio undefined");
            None
        }
    }

    /// Highest key-employee pay over the average pay of everyone else on the payroll.
    pub fn president_to_average_pay_ratio(&self, facts: &FilingFacts) -> Option<f64> {
        let key_pay: Vec<f64> = facts
            .key_employees
            .as_deref()?
            .iter()
            .filter_map(|e| e.compensation)
            .collect();
        let top_pay = key_pay.iter().copied().reduce(f64::max)?;

        let total_compensation = facts.total_compensation?;
        let total_employees = facts.total_employees?;

        let listed = i64::try_from(key_pay.len()).ok()?;
        let remaining_employees = total_employees.checked_sub(listed)?;
        if remaining_employees <= 0 {
            tracing::debug!(
                "No employees left outside Schedule J ({} total, {} listed)",
                total_employees,
                key_pay.len()
            );
            return None;
        }

        let remaining_pay = total_compensation - key_pay.iter().sum::<f64>();
        let average_pay = remaining_pay / remaining_employees as f64;
        if average_pay <= 0.0 {
            return None;
        }
        Some(top_pay / average_pay)
    }
}
