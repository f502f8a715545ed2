use std::io::Write;

use simplecsv_api::{CsvError, Dialect, RowSink};

// ═══════════════════════════════════════════════════════════════
//  CsvEncoder
// ═══════════════════════════════════════════════════════════════

/// Энкодер CSV: события `RowSink` → байты в `W`.
///
/// Квотирование — точная инверсия декодера: всё, что декодер трактует
/// особо, квотируется, а каждая кавычка внутри значения удваивается.
/// Отсутствующая ячейка (`None`) даёт пустое неквотированное поле.
pub struct CsvEncoder<W> {
    out: W,
    dialect: Dialect,
    /// Следующая ячейка — первая в строке (разделитель не нужен).
    first: bool,
}

impl<W: Write> CsvEncoder<W> {
    pub fn new(out: W) -> Self {
        Self::with_dialect(out, Dialect::default())
    }

    pub fn with_dialect(out: W, dialect: Dialect) -> Self {
        Self {
            out,
            dialect,
            first: true,
        }
    }

    /// Записать строку целиком.
    pub fn write_row<'a, I>(&mut self, cells: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        self.begin_row()?;
        for cell in cells {
            self.cell(cell)?;
        }
        self.end_row()
    }

    pub fn flush(&mut self) -> Result<(), CsvError> {
        self.out.flush()?;
        Ok(())
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_quoted(&mut self, data: &[u8]) -> std::io::Result<()> {
        let quote = [self.dialect.quote];
        self.out.write_all(&quote)?;

        // Пишем кусками: каждый кусок заканчивается кавычкой, за ним вторая.
        let mut rest = data;
        while let Some(pos) = rest.iter().position(|&b| b == self.dialect.quote) {
            self.out.write_all(&rest[..=pos])?;
            self.out.write_all(&quote)?;
            rest = &rest[pos + 1..];
        }
        self.out.write_all(rest)?;

        self.out.write_all(&quote)
    }
}

impl<W: Write> RowSink for CsvEncoder<W> {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        self.first = true;
        Ok(())
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        if self.first {
            self.first = false;
        } else {
            self.out.write_all(&[self.dialect.separator])?;
        }

        let Some(data) = data else {
            return Ok(());
        };

        if self.dialect.smart_quote && !needs_quoting(data, &self.dialect) {
            self.out.write_all(data)?;
        } else {
            self.write_quoted(data)?;
        }
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Нужно ли квотировать значение, чтобы декодер вернул его без изменений.
///
/// Кроме кавычки, разделителя и `\n` сюда входят пустая строка (иначе она
/// прочитается как отсутствующая ячейка) и пробел на краях (декодер
/// обрезает его у неквотированных значений).
pub fn needs_quoting(data: &[u8], dialect: &Dialect) -> bool {
    if data.is_empty() || data.first() == Some(&b' ') || data.last() == Some(&b' ') {
        return true;
    }
    data.iter()
        .any(|&b| b == dialect.quote || b == dialect.separator || b == b'\n')
}

/// Закодировать строки в память.
pub fn encode_rows<R, C>(rows: R, dialect: Dialect) -> Result<Vec<u8>, CsvError>
where
    R: IntoIterator<Item = C>,
    C: AsRef<[Option<Vec<u8>>]>,
{
    let mut enc = CsvEncoder::with_dialect(Vec::new(), dialect);
    for row in rows {
        enc.write_row(row.as_ref().iter().map(|c| c.as_deref()))?;
    }
    Ok(enc.into_inner())
}
