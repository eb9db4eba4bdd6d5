//! Little-endian element encoding driven by a `TypeDescriptor`.
//!
//! Fixed-size data lives inline in element slots at the offsets recorded in
//! the descriptor. Variable-length payloads (strings and arrays) go to a
//! [`GlobalHeap`] that travels with the buffer; their slot holds the element
//! count, the heap collection address and a 1-based object index, so an
//! all-zero slot always decodes as an empty value.

use crate::internal_prelude::*;
use crate::types::{EnumValue, FloatSize, IntValue, Value, VARLEN_SLOT_SIZE};

/// Per-buffer storage for variable-length payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalHeap {
    objects: Vec<Vec<u8>>,
}

impl GlobalHeap {
    /// Address written into every slot that points into this heap.
    pub const COLLECTION_ADDR: u64 = 1;

    /// Stores `bytes` and returns its object index (never zero).
    pub fn insert(&mut self, bytes: Vec<u8>) -> Result<u32> {
        self.objects.push(bytes);
        u32::try_from(self.objects.len()).map_err(|_| "global heap is full".into())
    }

    pub fn get(&self, index: u32) -> Option<&[u8]> {
        let i = usize::try_from(index).ok()?.checked_sub(1)?;
        self.objects.get(i).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Total payload size of all objects.
    pub fn byte_size(&self) -> usize {
        self.objects.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Encoded elements plus the heap their variable-length slots refer to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawBuffer {
    pub bytes: Vec<u8>,
    pub heap: GlobalHeap,
}

impl RawBuffer {
    /// Zero-filled buffer for `count` elements of `dtype`.
    pub fn zeroed(dtype: &TypeDescriptor, count: usize) -> Self {
        Self { bytes: vec![0; dtype.size() * count], heap: GlobalHeap::default() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn encode(dtype: &TypeDescriptor, values: &[Value]) -> Result<RawBuffer> {
    let mut raw = RawBuffer::zeroed(dtype, values.len());
    let size = dtype.size();
    if size > 0 {
        for (slot, value) in raw.bytes.chunks_exact_mut(size).zip(values) {
            encode_into(dtype, value, slot, &mut raw.heap)?;
        }
    }
    Ok(raw)
}

pub fn decode(dtype: &TypeDescriptor, raw: &RawBuffer) -> Result<Vec<Value>> {
    let size = dtype.size();
    ensure!(size > 0, "cannot decode zero-sized type {}", dtype);
    ensure!(
        raw.bytes.len() % size == 0,
        "buffer of {} bytes is not a whole number of {}-byte elements",
        raw.bytes.len(),
        size
    );
    raw.bytes.chunks_exact(size).map(|slot| decode_from(dtype, slot, &raw.heap)).collect()
}

fn write_int(value: i128, out: &mut [u8]) {
    let bytes = (value as u64).to_le_bytes();
    let n = out.len();
    out.copy_from_slice(&bytes[..n]);
}

fn read_int(src: &[u8], signed: bool) -> i128 {
    let n = src.len();
    let mut bytes = [0u8; 8];
    bytes[..n].copy_from_slice(src);
    let raw = u64::from_le_bytes(bytes);
    if signed {
        let shift = 64 - 8 * n as u32;
        i128::from(((raw << shift) as i64) >> shift)
    } else {
        i128::from(raw)
    }
}

fn check_range(dtype: &TypeDescriptor, value: i128) -> Result<()> {
    match dtype.integer_range() {
        Some(range) if range.contains(value) => Ok(()),
        _ => fail!("value {} is out of range for {}", value, dtype),
    }
}

fn write_slot(out: &mut [u8], count: usize, index: u32) -> Result<()> {
    let count = u32::try_from(count).map_err(|_| "variable-length data is too long")?;
    out[0..4].copy_from_slice(&count.to_le_bytes());
    out[4..12].copy_from_slice(&GlobalHeap::COLLECTION_ADDR.to_le_bytes());
    out[12..16].copy_from_slice(&index.to_le_bytes());
    Ok(())
}

/// Returns the element count and heap payload referenced by a slot.
fn read_slot<'h>(src: &[u8], heap: &'h GlobalHeap) -> Result<(usize, &'h [u8])> {
    let count = read_int(&src[0..4], false) as usize;
    let index = read_int(&src[12..16], false) as u32;
    if index == 0 {
        ensure!(count == 0, "dangling variable-length slot with {} elements", count);
        let empty: &[u8] = &[];
        return Ok((0, empty));
    }
    match heap.get(index) {
        Some(bytes) => Ok((count, bytes)),
        None => fail!("global heap object {} not found", index),
    }
}

fn encode_into(
    dtype: &TypeDescriptor, value: &Value, out: &mut [u8], heap: &mut GlobalHeap,
) -> Result<()> {
    use crate::types::TypeDescriptor::*;

    match *dtype {
        Integer(_) | Unsigned(_) | FixedPoint(_) => {
            let x = value.as_int()?.to_i128();
            check_range(dtype, x)?;
            write_int(x, out);
        }
        Bitfield(_) => {
            let x = i128::from(value.as_bitfield()?);
            check_range(dtype, x)?;
            write_int(x, out);
        }
        Enum(ref tp) => {
            let bits = match *value {
                Value::Enum(ref member) => match tp.member_by_name(&member.name) {
                    Some(m) => m.value,
                    None => fail!("enum has no member named '{}'", member.name),
                },
                _ => value.enum_bits()?,
            };
            ensure!(tp.member_by_value(bits).is_some(), "enum has no member with value {}", bits);
            write_int(i128::from(bits), out);
        }
        Float(FloatSize::U4) => out.copy_from_slice(&(value.as_f64()? as f32).to_le_bytes()),
        Float(FloatSize::U8) => out.copy_from_slice(&value.as_f64()?.to_le_bytes()),
        Boolean => out[0] = u8::from(value.as_bool()?),
        Compound(ref tp) => {
            for field in &tp.fields {
                let end = field.offset + field.ty.size();
                ensure!(end <= out.len(), "field '{}' overruns its compound", field.name);
                encode_into(&field.ty, value.field(&field.name)?, &mut out[field.offset..end], heap)?;
            }
        }
        FixedArray(ref ty, n) => {
            let items = value.as_array()?;
            ensure!(items.len() == n, "expected {} array elements, got {}", n, items.len());
            let size = ty.size();
            ensure!(out.len() >= n * size, "array of {} elements overruns its slot", n);
            for (i, item) in items.iter().enumerate() {
                encode_into(ty, item, &mut out[i * size..(i + 1) * size], heap)?;
            }
        }
        FixedAscii(n) | FixedUnicode(n) => {
            let s = value.as_str()?;
            if let FixedAscii(_) = *dtype {
                ensure!(s.is_ascii(), "string {:?} is not ascii", s);
            }
            ensure!(s.len() <= n, "string of {} bytes does not fit into {}", s.len(), dtype);
            out[..s.len()].copy_from_slice(s.as_bytes());
        }
        VarLenAscii | VarLenUnicode => {
            let s = value.as_str()?;
            if let VarLenAscii = *dtype {
                ensure!(s.is_ascii(), "string {:?} is not ascii", s);
            }
            ensure!(!s.contains('\0'), "variable length string with internal null");
            if !s.is_empty() {
                let index = heap.insert(s.as_bytes().to_vec())?;
                write_slot(out, s.len(), index)?;
            }
        }
        VarLenArray(ref ty) => {
            let items = value.as_varlen()?;
            if !items.is_empty() {
                let size = ty.size();
                let mut payload = vec![0; size * items.len()];
                if size > 0 {
                    for (slot, item) in payload.chunks_exact_mut(size).zip(items) {
                        encode_into(ty, item, slot, heap)?;
                    }
                }
                let index = heap.insert(payload)?;
                write_slot(out, items.len(), index)?;
            }
        }
        Opaque(ref tp) => {
            let bytes = value.as_opaque()?;
            ensure!(
                bytes.len() == tp.size,
                "opaque value of {} bytes does not match size {}",
                bytes.len(),
                tp.size
            );
            out.copy_from_slice(bytes);
        }
        Reference => out.copy_from_slice(&value.as_reference()?.addr().to_le_bytes()),
        Time => out.copy_from_slice(&value.as_time()?.to_le_bytes()),
    }
    Ok(())
}

fn decode_from(dtype: &TypeDescriptor, src: &[u8], heap: &GlobalHeap) -> Result<Value> {
    use crate::types::TypeDescriptor::*;

    Ok(match *dtype {
        Integer(size) | Unsigned(size) => {
            let signed = matches!(*dtype, Integer(_));
            let x = read_int(src, signed);
            match IntValue::from_i128(x, size, signed) {
                Some(v) => Value::Integer(v),
                None => fail!("value {} is out of range for {}", x, dtype),
            }
        }
        FixedPoint(ref tp) => {
            let x = read_int(src, tp.signed);
            match IntValue::from_i128(x, tp.size, tp.signed) {
                Some(v) => Value::Integer(v),
                None => fail!("value {} is out of range for {}", x, dtype),
            }
        }
        Bitfield(_) => Value::Bitfield(read_int(src, false) as u64),
        Enum(ref tp) => {
            let bits = read_int(src, tp.signed) as u64;
            match tp.member_by_value(bits) {
                Some(m) => Value::Enum(EnumValue { name: m.name.clone(), value: bits }),
                None => fail!("enum has no member with value {}", bits),
            }
        }
        Float(FloatSize::U4) => {
            let mut bytes = [0; 4];
            bytes.copy_from_slice(src);
            Value::Float32(f32::from_le_bytes(bytes))
        }
        Float(FloatSize::U8) => {
            let mut bytes = [0; 8];
            bytes.copy_from_slice(src);
            Value::Float64(f64::from_le_bytes(bytes))
        }
        Boolean => Value::Boolean(src[0] != 0),
        Compound(ref tp) => {
            let mut fields = Vec::with_capacity(tp.fields.len());
            for field in &tp.fields {
                let end = field.offset + field.ty.size();
                ensure!(end <= src.len(), "field '{}' overruns its compound", field.name);
                let value = decode_from(&field.ty, &src[field.offset..end], heap)?;
                fields.push((field.name.clone(), value));
            }
            Value::Compound(fields)
        }
        FixedArray(ref ty, n) => {
            let size = ty.size();
            ensure!(src.len() >= n * size, "array of {} elements overruns its slot", n);
            Value::Array(
                (0..n)
                    .map(|i| decode_from(ty, &src[i * size..(i + 1) * size], heap))
                    .collect::<Result<_>>()?,
            )
        }
        FixedAscii(_) | FixedUnicode(_) => {
            let len = src.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
            match String::from_utf8(src[..len].to_vec()) {
                Ok(s) => Value::String(s),
                Err(_) => fail!("invalid utf-8 in {}", dtype),
            }
        }
        VarLenAscii | VarLenUnicode => {
            let (_, bytes) = read_slot(src, heap)?;
            match String::from_utf8(bytes.to_vec()) {
                Ok(s) => Value::String(s),
                Err(_) => fail!("invalid utf-8 in {}", dtype),
            }
        }
        VarLenArray(ref ty) => {
            let (count, bytes) = read_slot(src, heap)?;
            let size = ty.size();
            ensure!(bytes.len() == count * size, "variable-length payload has wrong size");
            let items = if size == 0 {
                Vec::new()
            } else {
                bytes.chunks_exact(size).map(|s| decode_from(ty, s, heap)).collect::<Result<_>>()?
            };
            Value::VarLenArray(items)
        }
        Opaque(_) => Value::Opaque(src.to_vec()),
        Reference => {
            Value::Reference(ObjectReference::from_addr(read_int(src, false) as u64))
        }
        Time => Value::Time(read_int(src, true) as i64),
    })
}

const _: () = assert!(VARLEN_SLOT_SIZE == 16);
