use serde::Serialize;

/// One row of the anytime trace: how the archive's hypervolume looked at a
/// given point in the run.
///
/// GSEMO and PLS emit [`AnytimeRow::Plain`]; IBEA, being generational, emits
/// [`AnytimeRow::Generational`]. Time increases monotonically (non-
/// strictly) across a run's rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnytimeRow {
    Plain { evaluation: u64, hypervolume: f64 },
    Generational { evaluation: u64, generation: u64, hypervolume: f64 },
}

impl AnytimeRow {
    pub fn evaluation(&self) -> u64 {
        match self {
            AnytimeRow::Plain { evaluation, .. } => *evaluation,
            AnytimeRow::Generational { evaluation, .. } => *evaluation,
        }
    }

    pub fn hypervolume(&self) -> f64 {
        match self {
            AnytimeRow::Plain { hypervolume, .. } => *hypervolume,
            AnytimeRow::Generational { hypervolume, .. } => *hypervolume,
        }
    }
}

/// The callback a driver invokes once per emitted row. Rendering the row to
/// CSV, JSON, or anything else is an external collaborator's concern.
pub type Callback<'a> = dyn FnMut(AnytimeRow) + 'a;
