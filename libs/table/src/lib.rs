//! Разреженная таблица поверх событий декодера.
//!
//! [`TableBuilder`] реализует `RowSink` и раскладывает ячейки по строкам,
//! [`Table::write`] отдаёт их обратно в любой `RowSink` (например, энкодер).

mod builder;
mod json;
mod nocase;
mod row;
mod table;
mod value;

pub use builder::TableBuilder;
pub use nocase::{NoCaseKey, cmp_nocase};
pub use row::Row;
pub use table::Table;
pub use value::Value;
