use serde::{Deserialize, Serialize};

use crate::careers::domain::LocationCountry;

/// The kinds of screen the intake wizard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    BasicInfo,
    Immigration,
    SelfIdentification,
    Review,
}

impl IntakeStep {
    pub const fn title(self) -> &'static str {
        match self {
            IntakeStep::BasicInfo => "Basic Info",
            IntakeStep::Immigration => "Immigration",
            IntakeStep::SelfIdentification => "Voluntary Self-Identification",
            IntakeStep::Review => "Review & Submit",
        }
    }
}

const USA_STEPS: [IntakeStep; 4] = [
    IntakeStep::BasicInfo,
    IntakeStep::Immigration,
    IntakeStep::SelfIdentification,
    IntakeStep::Review,
];

const DEFAULT_STEPS: [IntakeStep; 3] = [
    IntakeStep::BasicInfo,
    IntakeStep::SelfIdentification,
    IntakeStep::Review,
];

/// Step layout for one job. Step indices are 1-based, matching what applicants see.
///
/// All index arithmetic lives here so the immigration step's presence shifts the EEO and
/// review indices in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    country: LocationCountry,
}

impl StepPlan {
    pub const fn for_country(country: LocationCountry) -> Self {
        Self { country }
    }

    pub const fn country(&self) -> LocationCountry {
        self.country
    }

    pub const fn includes_immigration(&self) -> bool {
        self.country.is_usa()
    }

    pub fn steps(&self) -> &'static [IntakeStep] {
        if self.includes_immigration() {
            &USA_STEPS
        } else {
            &DEFAULT_STEPS
        }
    }

    pub fn total_steps(&self) -> usize {
        self.steps().len()
    }

    pub const fn first_step(&self) -> usize {
        1
    }

    pub fn eeo_step(&self) -> usize {
        if self.includes_immigration() {
            3
        } else {
            2
        }
    }

    pub fn review_step(&self) -> usize {
        self.total_steps()
    }

    pub fn step_at(&self, index: usize) -> Option<IntakeStep> {
        index
            .checked_sub(1)
            .and_then(|offset| self.steps().get(offset).copied())
    }

    pub fn index_of(&self, step: IntakeStep) -> Option<usize> {
        self.steps()
            .iter()
            .position(|candidate| *candidate == step)
            .map(|offset| offset + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usa_plan_has_four_steps_with_immigration_second() {
        let plan = StepPlan::for_country(LocationCountry::Usa);
        assert_eq!(plan.total_steps(), 4);
        assert_eq!(plan.step_at(2), Some(IntakeStep::Immigration));
        assert_eq!(plan.eeo_step(), 3);
        assert_eq!(plan.step_at(plan.eeo_step()), Some(IntakeStep::SelfIdentification));
        assert_eq!(plan.step_at(4), Some(IntakeStep::Review));
    }

    #[test]
    fn india_plan_skips_immigration() {
        let plan = StepPlan::for_country(LocationCountry::India);
        assert_eq!(plan.total_steps(), 3);
        assert_eq!(plan.eeo_step(), 2);
        assert_eq!(plan.review_step(), 3);
        assert_eq!(plan.index_of(IntakeStep::Immigration), None);
        assert!(plan.steps().iter().all(|step| *step != IntakeStep::Immigration));
    }

    #[test]
    fn out_of_range_indices_have_no_step() {
        let plan = StepPlan::for_country(LocationCountry::Usa);
        assert_eq!(plan.step_at(0), None);
        assert_eq!(plan.step_at(5), None);
    }
}
