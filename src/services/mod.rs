// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod https_redirect;
pub mod logging;
pub mod openapi;
pub mod route_table;
pub mod version_reader;
