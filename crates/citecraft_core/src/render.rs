/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Typesetting targets for generated citation directives.

pub mod format;
pub mod latex;

pub use format::Typesetter;
pub use latex::Latex;
