//! Multi-Source Metric Fusion
//!
//! ## Overview
//!
//! A person wearing a watch, a chest strap and a ring produces three heart
//! rate streams that never quite agree. Fusion turns them into one series
//! that can be trusted:
//!
//! ```text
//! watch ──┐
//! strap ──┼─→ group ─→ rank ─→ detect ─→ resolve ─→ score ─→ gap fill ─→ fused series
//! ring  ──┘                       ↓
//!                             conflicts
//! ```
//!
//! ## Stages
//!
//! 1. **Grouping** ([`grouping`]): bucket samples into same-instant groups
//! 2. **Ranking** ([`ranking`]): primary source first, then accuracy, then quality
//! 3. **Conflict detection** ([`conflict`]): pairwise differences beyond the
//!    metric tolerance
//! 4. **Resolution** ([`resolve`]): one value per group, per the rule's strategy
//! 5. **Scoring** ([`confidence`]): confidence and quality on a 0-100 scale
//! 6. **Gap filling** ([`interpolate`]): synthesize points across device dropouts
//!
//! [`pipeline`] sequences the stages for one (user, metric) batch.
//!
//! ## Determinism
//!
//! Every stage is a pure function of its inputs. Grouping output is ordered
//! by instant, ranking is a stable sort, and conflict pairs are emitted in
//! ranked order, so repeated runs produce the same values and scores.

pub mod confidence;
pub mod conflict;
pub mod grouping;
pub mod interpolate;
pub mod pipeline;
pub mod ranking;
pub mod resolve;

pub use confidence::{score_group, GroupScores, Score};
pub use conflict::{detect_conflicts, detect_for_metric, Conflict};
pub use grouping::{group_samples, GroupingMode, Groups};
pub use interpolate::{interpolate_value, GapFill, GapFiller};
pub use pipeline::{FusionCounts, MetricFusion, MetricOutput};
pub use ranking::{rank_samples, ranked};
pub use resolve::{resolve, weighted_average, MethodLabels, Resolution};
