//! Курсор по полностью буферизованным байтам.
//!
//! [`ByteReader`]: представление неизменяемого среза с позицией чтения,
//! [`ByteWriter`]: зеркальные операции записи в накапливаемый буфер.
//! Все числа big-endian. Перемотки назад нет.

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use nbtcodec_error::{NbtError, NbtResult};

/// Чтение примитивов из среза без копирования всего буфера.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Текущее смещение от начала буфера.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Читает ровно `width` байт и сдвигает позицию.
    pub fn read_fixed(
        &mut self,
        width: usize,
    ) -> NbtResult<&'a [u8]> {
        if width > self.remaining() {
            return Err(NbtError::TruncatedInput {
                offset: self.pos,
                needed: width,
                available: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + width];
        self.pos += width;
        Ok(out)
    }

    /// Беззнаковое big-endian число шириной 1..=8 байт.
    pub fn read_be_uint(
        &mut self,
        width: usize,
    ) -> NbtResult<u64> {
        debug_assert!((1..=8).contains(&width));
        let bytes = self.read_fixed(width)?;
        Ok(BigEndian::read_uint(bytes, width))
    }

    /// Префикс длины шириной `length_width`, затем столько же байт.
    pub fn read_length_prefixed(
        &mut self,
        length_width: usize,
    ) -> NbtResult<&'a [u8]> {
        let len = self.read_be_uint(length_width)?;
        let len = usize::try_from(len).map_err(|_| NbtError::TruncatedInput {
            offset: self.pos,
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        self.read_fixed(len)
    }

    pub fn read_u8(&mut self) -> NbtResult<u8> {
        Ok(self.read_fixed(1)?[0])
    }

    pub fn read_i8(&mut self) -> NbtResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_i16(&mut self) -> NbtResult<i16> {
        Ok(BigEndian::read_i16(self.read_fixed(2)?))
    }

    pub fn read_u16(&mut self) -> NbtResult<u16> {
        Ok(BigEndian::read_u16(self.read_fixed(2)?))
    }

    pub fn read_i32(&mut self) -> NbtResult<i32> {
        Ok(BigEndian::read_i32(self.read_fixed(4)?))
    }

    pub fn read_u32(&mut self) -> NbtResult<u32> {
        Ok(BigEndian::read_u32(self.read_fixed(4)?))
    }

    pub fn read_i64(&mut self) -> NbtResult<i64> {
        Ok(BigEndian::read_i64(self.read_fixed(8)?))
    }

    pub fn read_f32(&mut self) -> NbtResult<f32> {
        Ok(BigEndian::read_f32(self.read_fixed(4)?))
    }

    pub fn read_f64(&mut self) -> NbtResult<f64> {
        Ok(BigEndian::read_f64(self.read_fixed(8)?))
    }
}

/// Накопитель выходных байт.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_fixed(
        &mut self,
        bytes: &[u8],
    ) {
        self.buf.put_slice(bytes);
    }

    /// Беззнаковое big-endian число шириной 1..=8 байт.
    ///
    /// Ошибка, если значение не помещается в `width` байт.
    pub fn write_be_uint(
        &mut self,
        value: u64,
        width: usize,
    ) -> NbtResult<()> {
        debug_assert!((1..=8).contains(&width));
        if width < 8 && value >> (width * 8) != 0 {
            return Err(NbtError::unencodable(format!(
                "{value} does not fit in {width} bytes"
            )));
        }
        self.buf.put_uint(value, width);
        Ok(())
    }

    /// Префикс длины шириной `length_width`, затем сами байты.
    pub fn write_length_prefixed(
        &mut self,
        bytes: &[u8],
        length_width: usize,
    ) -> NbtResult<()> {
        self.write_be_uint(bytes.len() as u64, length_width)?;
        self.buf.put_slice(bytes);
        Ok(())
    }

    pub fn write_u8(
        &mut self,
        v: u8,
    ) {
        self.buf.put_u8(v);
    }

    pub fn write_i8(
        &mut self,
        v: i8,
    ) {
        self.buf.put_i8(v);
    }

    pub fn write_i16(
        &mut self,
        v: i16,
    ) {
        self.buf.put_i16(v);
    }

    pub fn write_u16(
        &mut self,
        v: u16,
    ) {
        self.buf.put_u16(v);
    }

    pub fn write_i32(
        &mut self,
        v: i32,
    ) {
        self.buf.put_i32(v);
    }

    pub fn write_u32(
        &mut self,
        v: u32,
    ) {
        self.buf.put_u32(v);
    }

    pub fn write_i64(
        &mut self,
        v: i64,
    ) {
        self.buf.put_i64(v);
    }

    pub fn write_f32(
        &mut self,
        v: f32,
    ) {
        self.buf.put_f32(v);
    }

    pub fn write_f64(
        &mut self,
        v: f64,
    ) {
        self.buf.put_f64(v);
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Отдаёт буфер без копирования.
    pub fn into_vec(self) -> Vec<u8> {
        Vec::from(self.buf)
    }
}
