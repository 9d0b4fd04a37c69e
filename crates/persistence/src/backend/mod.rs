// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend utilities.
//!
//! `SQLite` is the only supported backend. Backend-specific code (connection
//! initialization, migrations, PRAGMA configuration) lives here; all domain
//! queries and mutations use backend-agnostic Diesel DSL and live in
//! `queries/` and `mutations/`.

pub mod sqlite;
