//! Binary resources shipped inside packages.

pub mod icons;
