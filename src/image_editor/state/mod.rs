// SPDX-License-Identifier: MPL-2.0
//! Editor state pieces, one module per tool.

pub mod adjustment;
pub mod crop;
pub mod ink;

pub use adjustment::AdjustmentState;
pub use crop::CropDrag;
pub use ink::InkLayer;
