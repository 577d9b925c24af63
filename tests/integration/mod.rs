// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod delivery_history_test;
pub mod delivery_worker_test;
pub mod end_to_end_test;
pub mod endpoint_management_test;
pub mod retry_sweep_test;
