// Accumulator values inside a tick range

use perpamm_funding::{extrapolated_sum_fp, FundingState};
use perpamm_math::{checked_sub, PerpError, I256, U256};

use crate::types::{TickCheckpoint, TickStore, ValuesInside};

#[derive(Clone, Copy)]
struct Outside {
    sum_b: I256,
    sum_fp: I256,
    fee: U256,
}

fn outside_at(cp: &TickCheckpoint, sum_a_now: I256) -> Result<Outside, PerpError> {
    Ok(Outside {
        sum_b: cp.sum_b_outside_x128,
        sum_fp: extrapolated_sum_fp(
            cp.sum_fp_outside_x128,
            cp.sum_b_outside_x128,
            cp.sum_a_last_x128,
            sum_a_now,
        )?,
        fee: cp.fee_outside_x128,
    })
}

fn difference(a: Outside, b: Outside) -> Result<Outside, PerpError> {
    Ok(Outside {
        sum_b: checked_sub(a.sum_b, b.sum_b)?,
        sum_fp: checked_sub(a.sum_fp, b.sum_fp)?,
        fee: a.fee.wrapping_sub(b.fee),
    })
}

/// Values accrued inside `[tick_lower, tick_upper)`
///
/// `global` must be extrapolated to the time of the read; tick snapshots
/// are carried forward to its `sum_a`.
pub fn get_values_inside<S: TickStore>(
    store: &S,
    tick_lower: i32,
    tick_upper: i32,
    current_tick: i32,
    global: &FundingState,
    fee_growth_global_x128: U256,
) -> Result<ValuesInside, PerpError> {
    if tick_lower >= tick_upper {
        return Err(PerpError::IllegalTicks);
    }

    let sum_a_now = global.sum_a_x128;
    let lower = outside_at(&store.read_tick(tick_lower).checkpoint, sum_a_now)?;
    let upper = outside_at(&store.read_tick(tick_upper).checkpoint, sum_a_now)?;

    let inside = if current_tick < tick_lower {
        // both outsides hold the region above their tick
        difference(lower, upper)?
    } else if current_tick >= tick_upper {
        // both outsides hold the region below their tick
        difference(upper, lower)?
    } else {
        let global_values = Outside {
            sum_b: global.sum_b_x128,
            sum_fp: global.sum_fp_x128,
            fee: fee_growth_global_x128,
        };
        let below = difference(global_values, lower)?;
        difference(below, upper)?
    };

    Ok(ValuesInside {
        sum_a_x128: sum_a_now,
        sum_b_inside_x128: inside.sum_b,
        sum_fp_inside_x128: inside.sum_fp,
        fee_inside_x128: inside.fee,
    })
}
