use crate::Strategy;
use crate::error::StrategyError;
use crate::sma_crossover::SmaCrossover;
use configuration::Config;
use core_types::StrategyId;

/// Creates a new strategy instance based on the provided ID and configuration.
pub fn create_strategy(
    id: StrategyId,
    config: &Config,
) -> Result<Box<dyn Strategy>, StrategyError> {
    // The compiler will error if a new StrategyId is added but not handled here.
    match id {
        StrategyId::SmaCrossover => {
            let params = config.strategies.sma_crossover.clone();
            Ok(Box::new(SmaCrossover::new(params)?))
        }
    }
}
