//! Token distribution, vesting, and staking. Split into
//! three small submodules rather than one; each has its own store and no
//! submodule depends on another's internals.

pub mod distribution;
pub mod staking;
pub mod vesting;

pub use distribution::{category_vesting_policy, DistributionBucket, DistributionEngine};
pub use staking::{StakerInfo, StakingPool};
pub use vesting::{VestingSchedule, VestingStore};
