//! recquery - a declarative query pipeline over in-memory records
//!
//! Filter, sort, limit, reshape and format collections of flat JSON
//! records. Operators may be supplied in any order; the evaluator always
//! runs them in one canonical order.
//!
//! ```
//! use recquery::query::{collection_from_value, filter_in, select, sort_by, Query, SortOrder};
//! use serde_json::json;
//!
//! let friends = collection_from_value(json!([
//!     {"name": "Sam", "gender": "male", "city": "Perth"},
//!     {"name": "Mia", "gender": "female", "city": "Oslo"},
//!     {"name": "Liv", "gender": "female", "city": "Perth"},
//! ]));
//!
//! let result = Query::new(&friends)
//!     .with(select(["name"]))
//!     .with(sort_by("name", SortOrder::Asc))
//!     .with(filter_in("gender", ["female"]))
//!     .run();
//!
//! assert_eq!(result, collection_from_value(json!([{"name": "Liv"}, {"name": "Mia"}])));
//! ```

pub mod observability;
pub mod query;
