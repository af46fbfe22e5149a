// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod address;
pub mod forms;
pub mod ids;
pub mod model;
pub mod pagination;
pub mod query;
pub mod session;
pub mod state;

pub use address::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use pagination::*;
pub use query::ListQuery;
pub use session::*;
pub use state::*;
