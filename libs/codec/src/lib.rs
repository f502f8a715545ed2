//! Потоковый декодер и энкодер CSV.
//!
//! Декодер — байтовый конечный автомат ([`fsm`]), который превращает вход
//! в события [`RowSink`]. Энкодер сам является `RowSink` и сериализует
//! события обратно, квотируя ровно то, что декодер трактует особо:
//! `encode → decode` возвращает исходные ячейки.

pub mod fsm;
mod decoder;
mod encoder;

pub use decoder::{CsvDecoder, decode_rows};
pub use encoder::{CsvEncoder, encode_rows, needs_quoting};
pub use simplecsv_api::{
    Cells, CollectRows, CsvError, Dialect, ParseErrorKind, Position, QuotedNewline, RowSink,
};
