// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod analyzer;
pub mod checklist;
pub mod extractor;
pub mod logging;
