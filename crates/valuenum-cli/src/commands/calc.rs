use clap::{Args, Subcommand};
use valuenum_core::{calculate, CalculationInputs, SFormulaInputs, TimeValue, WFormulaInputs};

use super::{load_config, open_database};

/// Fields shared by both formulas.
#[derive(Args)]
pub struct CommonArgs {
    /// Time the task takes today, as H:MM or whole hours
    #[arg(long)]
    old_time: TimeValue,
    /// Effort of the current process (1-10)
    #[arg(long)]
    old_effort: f64,
    /// Time needed to learn the new process, as H:MM or whole hours
    #[arg(long)]
    training_time: TimeValue,
    /// Effort of the new process (1-10)
    #[arg(long)]
    new_effort: f64,
    /// Store the result in the calculation history
    #[arg(long)]
    save: bool,
    /// Caller id to store with a saved result
    #[arg(long, requires = "save")]
    caller: Option<String>,
}

#[derive(Subcommand)]
pub enum CalcAction {
    /// Time-only value: Z / (Y + V)
    S {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Cost-adjusted value: (Z x M) / (Y x T + V)
    W {
        #[command(flatten)]
        common: CommonArgs,
        /// Cost of the current process
        #[arg(long)]
        old_cost: f64,
        /// Cost of the new process
        #[arg(long)]
        new_cost: f64,
    },
}

pub fn run(action: CalcAction) -> Result<(), Box<dyn std::error::Error>> {
    let (inputs, common) = match action {
        CalcAction::S { common } => (
            CalculationInputs::S(SFormulaInputs {
                old_time: common.old_time,
                old_effort: common.old_effort,
                training_time: common.training_time,
                new_effort: common.new_effort,
            }),
            common,
        ),
        CalcAction::W {
            common,
            old_cost,
            new_cost,
        } => (
            CalculationInputs::W(WFormulaInputs {
                old_time: common.old_time,
                old_effort: common.old_effort,
                training_time: common.training_time,
                new_effort: common.new_effort,
                old_cost,
                new_cost,
            }),
            common,
        ),
    };

    let result = calculate(inputs)?;

    if common.save {
        let config = load_config()?;
        let db = open_database(&config)?;
        db.record_calculation(&result, common.caller.as_deref())?;
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
