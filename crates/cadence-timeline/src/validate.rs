use crate::stage::Stage;
use cadence_core::CadenceError;

/// Validate a stage for structural correctness before handing it to an engine.
pub fn validate_stage(stage: &Stage) -> Result<(), Vec<CadenceError>> {
    let mut errors = Vec::new();
    let mut labels = std::collections::HashSet::new();

    for (key, effect) in stage.iter() {
        if !stage.has_target(&effect.target) {
            errors.push(CadenceError::Validation(format!(
                "{} targets unregistered element '{}'",
                key, effect.target
            )));
        }

        // Offsets must be in range and non-decreasing
        let mut previous = 0.0;
        for step in effect.steps() {
            if !(0.0..=1.0).contains(&step.offset) {
                errors.push(CadenceError::Validation(format!(
                    "{} has offset {} outside [0, 1]",
                    key, step.offset
                )));
            }
            if step.offset < previous {
                errors.push(CadenceError::Validation(format!(
                    "{} has decreasing offsets ({} after {})",
                    key, step.offset, previous
                )));
            }
            previous = step.offset;
        }

        if !effect.duration().is_zero() {
            if let Some(last) = effect.steps().last() {
                if last.offset != 1.0 {
                    errors.push(CadenceError::Validation(format!(
                        "{} ends at offset {} instead of 1",
                        key, last.offset
                    )));
                }
            }
        }

        if let Some(id) = effect.id() {
            if !labels.insert(id.to_string()) {
                errors.push(CadenceError::Validation(format!(
                    "label '{}' is used by more than one effect",
                    id
                )));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
