//! Bounds-checked cursors over script bytes
//!
//! Both cursors express their position as an offset into the script. A
//! backward cursor's position is the exclusive end of the unread prefix, so
//! the two cursors meet when the backward position equals the forward one.

use crate::error::TemplateError;

/// One position of a byte template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateByte {
    Op(u8),
    Any,
}

impl TemplateByte {
    fn accepts(self, byte: u8) -> bool {
        match self {
            TemplateByte::Op(op) => op == byte,
            TemplateByte::Any => true,
        }
    }
}

/// Check `data` against `template` position by position.
///
/// `base` is the script offset of `data[0]`, used for error reporting.
pub fn match_template(
    data: &[u8],
    template: &[TemplateByte],
    base: usize,
) -> Result<(), TemplateError> {
    if data.len() < template.len() {
        return Err(TemplateError::OutOfBounds {
            needed: template.len(),
            available: data.len(),
        });
    }
    for (i, (&byte, &expected)) in data.iter().zip(template).enumerate() {
        if let TemplateByte::Op(op) = expected {
            if !expected.accepts(byte) {
                return Err(TemplateError::Mismatch {
                    offset: base + i,
                    expected: op,
                    found: byte,
                });
            }
        }
    }
    Ok(())
}

/// Cursor walking from the end of a script towards its start
#[derive(Debug, Clone)]
pub struct BackwardCursor<'a> {
    script: &'a [u8],
    pos: usize,
}

impl<'a> BackwardCursor<'a> {
    pub fn at_end(script: &'a [u8]) -> Self {
        Self { script, pos: script.len() }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume the `n` bytes preceding the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], TemplateError> {
        if n > self.pos {
            return Err(TemplateError::OutOfBounds { needed: n, available: self.pos });
        }
        self.pos -= n;
        Ok(&self.script[self.pos..self.pos + n])
    }

    pub fn take_byte(&mut self) -> Result<u8, TemplateError> {
        Ok(self.take(1)?[0])
    }

    pub fn skip(&mut self, n: usize) -> Result<(), TemplateError> {
        self.take(n).map(|_| ())
    }

    pub fn expect_op(&mut self, op: u8) -> Result<(), TemplateError> {
        let offset = self.pos.saturating_sub(1);
        let found = self.take_byte()?;
        if found != op {
            return Err(TemplateError::Mismatch { offset, expected: op, found });
        }
        Ok(())
    }

    /// Consume `template.len()` bytes and match them against `template`.
    pub fn take_template(&mut self, template: &[TemplateByte]) -> Result<&'a [u8], TemplateError> {
        let data = self.take(template.len())?;
        match_template(data, template, self.pos)?;
        Ok(data)
    }

    pub fn take_i32_le(&mut self) -> Result<i32, TemplateError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Cursor walking from the start of a script towards its end
#[derive(Debug, Clone)]
pub struct ForwardCursor<'a> {
    script: &'a [u8],
    pos: usize,
}

impl<'a> ForwardCursor<'a> {
    pub fn at_start(script: &'a [u8]) -> Self {
        Self { script, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.script.len() - self.pos
    }

    pub fn peek_byte(&self) -> Result<u8, TemplateError> {
        self.script
            .get(self.pos)
            .copied()
            .ok_or(TemplateError::OutOfBounds { needed: 1, available: 0 })
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], TemplateError> {
        if n > self.remaining() {
            return Err(TemplateError::OutOfBounds { needed: n, available: self.remaining() });
        }
        let data = &self.script[self.pos..self.pos + n];
        self.pos += n;
        Ok(data)
    }

    pub fn take_byte(&mut self) -> Result<u8, TemplateError> {
        Ok(self.take(1)?[0])
    }

    pub fn skip(&mut self, n: usize) -> Result<(), TemplateError> {
        self.take(n).map(|_| ())
    }

    /// Skip one push whose length is given by a single leading byte.
    pub fn skip_short_push(&mut self) -> Result<(), TemplateError> {
        let len = self.take_byte()? as usize;
        self.skip(len)
    }
}
