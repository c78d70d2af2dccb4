//! Encoding and decoding of a `Value` according to a `Schema`.

use crate::{Container, Field, Overlay, OverlayKind, Schema, Union, UintSize, Value};
use ssz::{
    check_list_len, check_vector_len, decode_fixed_length_items_with,
    decode_variable_length_items_with, decode_vector_with, split_union_bytes, write_offset,
    Bitlist, Bitvector, Decode, Error, ErrorKind, SszDecoderBuilder, UnionSelector, U256,
    BYTES_PER_LENGTH_OFFSET, BYTES_PER_UNION_SELECTOR,
};

/// Where an item sits within its parent, used to annotate errors.
#[derive(Clone, Copy)]
enum Location<'a> {
    Field(&'a str),
    Index(usize),
}

impl<'a> Location<'a> {
    fn annotate(self, e: Error) -> Error {
        match self {
            Location::Field(name) => e.in_field(name),
            Location::Index(i) => e.at_index(i),
        }
    }
}

/// The items of a vector or list, which are either bytes or other values.
pub(crate) enum Items<'a> {
    Bytes(&'a [u8]),
    Values(&'a [Value]),
}

impl<'a> Items<'a> {
    pub(crate) fn new(element: &Schema, value: &'a Value) -> Result<Self, Error> {
        match (element.is_byte(), value) {
            (true, Value::Bytes(bytes)) => Ok(Items::Bytes(bytes)),
            (false, Value::Sequence(values)) => Ok(Items::Values(values)),
            (true, _) => Err(Error::value_mismatch("bytes")),
            (false, _) => Err(Error::value_mismatch("sequence")),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Items::Bytes(bytes) => bytes.len(),
            Items::Values(values) => values.len(),
        }
    }
}

/// Returns the SSZ encoding of `value`.
///
/// ## Errors
///
/// - `SizeViolation` if a vector, bitvector or uint does not fit its declared size.
/// - `MaxSizeViolation` if a list or bitlist exceeds its maximum, or an offset exceeds `u32`.
/// - `ValueMismatch` if `value` does not have the shape required by `schema`.
pub fn encode(schema: &Schema, value: &Value) -> Result<Vec<u8>, Error> {
    let mut buf = vec![];
    encode_into(schema, value, &mut buf)?;
    Ok(buf)
}

/// Returns the length of `encode(schema, value)` without encoding, applying the same validation.
pub fn size_of(schema: &Schema, value: &Value) -> Result<usize, Error> {
    match (schema, value) {
        (Schema::Pointer(referent), Value::Null) => size_of(referent, &referent.default_value()),
        (Schema::Pointer(referent), value) => size_of(referent, value),
        (Schema::Overlay(overlay), value) => overlay_size_of(overlay, value),
        (Schema::Bool, Value::Bool(_)) | (Schema::Byte, Value::Byte(_)) => Ok(1),
        (Schema::Uint(size), Value::Uint(n)) => check_uint(*size, n).map(|_| size.bytes()),
        (Schema::Vector { element, len }, value) => {
            let items = Items::new(element, value)?;
            check_vector_len(items.len(), *len)?;
            items_size_of(element, &items)
        }
        (Schema::List { element, max_len }, value) => {
            let items = Items::new(element, value)?;
            check_list_len(items.len(), *max_len)?;
            items_size_of(element, &items)
        }
        (Schema::Container(container), Value::Container(values)) => {
            let fields = container_fields(container, values)?;
            composite_size_of(fields.map(|(field, value)| {
                (Location::Field(&field.name), &field.schema, value)
            }))
        }
        (Schema::Union(union), Value::Union { selector, value }) => {
            let (variant, value) = union_variant(union, *selector, value.as_deref())?;
            match (&variant.schema, value) {
                (Some(schema), Some(value)) => size_of(schema, value)
                    .map(|len| len + BYTES_PER_UNION_SELECTOR)
                    .map_err(|e| e.in_field(&variant.name)),
                (None, None) => Ok(BYTES_PER_UNION_SELECTOR),
                _ => Err(Error::value_mismatch("union")),
            }
        }
        (schema, _) => Err(Error::value_mismatch(schema.shape())),
    }
}

fn items_size_of(element: &Schema, items: &Items) -> Result<usize, Error> {
    match items {
        Items::Bytes(bytes) => Ok(bytes.len()),
        Items::Values(values) => composite_size_of(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| (Location::Index(i), element, value)),
        ),
    }
}

fn composite_size_of<'a, I>(parts: I) -> Result<usize, Error>
where
    I: Iterator<Item = (Location<'a>, &'a Schema, &'a Value)>,
{
    parts
        .map(|(location, schema, value)| {
            let len = size_of(schema, value).map_err(|e| location.annotate(e))?;
            if schema.is_variable_size() {
                Ok(len + BYTES_PER_LENGTH_OFFSET)
            } else {
                Ok(len)
            }
        })
        .sum()
}

fn overlay_size_of(overlay: &Overlay, value: &Value) -> Result<usize, Error> {
    match (overlay.kind(), value) {
        (OverlayKind::Plain, value) => size_of(overlay.underlying(), value),
        (OverlayKind::Bitlist { max_bits }, Value::Bytes(bytes)) => {
            Bitlist::from_raw_bytes(bytes, max_bits).map(|_| bytes.len())
        }
        (OverlayKind::Bitvector { bits }, Value::Bytes(bytes)) => {
            Bitvector::from_raw_bytes(bytes, bits).map(|_| bytes.len())
        }
        _ => Err(Error::value_mismatch("bytes")),
    }
}

pub(crate) fn encode_into(
    schema: &Schema,
    value: &Value,
    buf: &mut Vec<u8>,
) -> Result<(), Error> {
    match (schema, value) {
        (Schema::Pointer(referent), Value::Null) => {
            encode_into(referent, &referent.default_value(), buf)
        }
        (Schema::Pointer(referent), value) => encode_into(referent, value, buf),
        (Schema::Overlay(overlay), value) => encode_overlay(overlay, value, buf),
        (Schema::Bool, Value::Bool(b)) => {
            buf.push(*b as u8);
            Ok(())
        }
        (Schema::Byte, Value::Byte(b)) => {
            buf.push(*b);
            Ok(())
        }
        (Schema::Uint(size), Value::Uint(n)) => encode_uint(*size, n, buf),
        (Schema::Vector { element, len }, value) => {
            let items = Items::new(element, value)?;
            check_vector_len(items.len(), *len)?;
            encode_items(element, &items, buf)
        }
        (Schema::List { element, max_len }, value) => {
            let items = Items::new(element, value)?;
            check_list_len(items.len(), *max_len)?;
            encode_items(element, &items, buf)
        }
        (Schema::Container(container), Value::Container(values)) => {
            let fields = container_fields(container, values)?;
            encode_composite(
                fields
                    .map(|(field, value)| (Location::Field(&field.name), &field.schema, value))
                    .collect(),
                buf,
            )
        }
        (Schema::Union(union), Value::Union { selector, value }) => {
            let (variant, value) = union_variant(union, *selector, value.as_deref())?;
            buf.push(*selector);
            match (&variant.schema, value) {
                (Some(schema), Some(value)) => {
                    encode_into(schema, value, buf).map_err(|e| e.in_field(&variant.name))
                }
                (None, None) => Ok(()),
                _ => Err(Error::value_mismatch("union")),
            }
        }
        (schema, _) => Err(Error::value_mismatch(schema.shape())),
    }
}

fn check_uint(size: UintSize, n: &U256) -> Result<(), Error> {
    if n.bits() > size.bits() {
        Err(Error::size_violation((n.bits() + 7) / 8, size.bytes()))
    } else {
        Ok(())
    }
}

fn encode_uint(size: UintSize, n: &U256, buf: &mut Vec<u8>) -> Result<(), Error> {
    check_uint(size, n)?;

    let mut bytes = [0; 32];
    n.to_little_endian(&mut bytes);
    buf.extend_from_slice(&bytes[..size.bytes()]);

    Ok(())
}

fn encode_overlay(overlay: &Overlay, value: &Value, buf: &mut Vec<u8>) -> Result<(), Error> {
    match (overlay.kind(), value) {
        (OverlayKind::Plain, value) => encode_into(overlay.underlying(), value, buf),
        (OverlayKind::Bitlist { max_bits }, Value::Bytes(bytes)) => {
            Bitlist::from_raw_bytes(bytes, max_bits)?;
            buf.extend_from_slice(bytes);
            Ok(())
        }
        (OverlayKind::Bitvector { bits }, Value::Bytes(bytes)) => {
            Bitvector::from_raw_bytes(bytes, bits)?;
            buf.extend_from_slice(bytes);
            Ok(())
        }
        _ => Err(Error::value_mismatch("bytes")),
    }
}

fn encode_items(element: &Schema, items: &Items, buf: &mut Vec<u8>) -> Result<(), Error> {
    match items {
        Items::Bytes(bytes) => {
            buf.extend_from_slice(bytes);
            Ok(())
        }
        Items::Values(values) => encode_composite(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| (Location::Index(i), element, value))
                .collect(),
            buf,
        ),
    }
}

/// Writes the fixed region of `parts`, leaving a placeholder for the offset of each
/// variable-size part, then appends each variable-size part and back-patches its offset.
///
/// Offsets are relative to the start of this composite, not of `buf`.
fn encode_composite(
    parts: Vec<(Location, &Schema, &Value)>,
    buf: &mut Vec<u8>,
) -> Result<(), Error> {
    let start = buf.len();
    let fixed_region_len: usize = parts.iter().map(|(_, schema, _)| schema.ssz_fixed_len()).sum();
    buf.reserve(fixed_region_len);

    let mut placeholders = Vec::with_capacity(parts.len());

    for (i, (location, schema, value)) in parts.iter().enumerate() {
        if schema.is_variable_size() {
            placeholders.push((buf.len(), i));
            buf.extend_from_slice(&[0; BYTES_PER_LENGTH_OFFSET]);
        } else {
            encode_into(schema, value, buf).map_err(|e| location.annotate(e))?;
        }
    }

    if buf.len() - start != fixed_region_len {
        return Err(ErrorKind::BytesInvalid(format!(
            "fixed region is {} bytes, expected {}",
            buf.len() - start,
            fixed_region_len
        ))
        .into());
    }

    let mut offset_bytes = Vec::with_capacity(BYTES_PER_LENGTH_OFFSET);

    for (position, i) in placeholders {
        let (location, schema, value) = parts[i];

        offset_bytes.clear();
        write_offset(&mut offset_bytes, buf.len() - start).map_err(|e| location.annotate(e))?;
        buf[position..position + BYTES_PER_LENGTH_OFFSET].copy_from_slice(&offset_bytes);

        encode_into(schema, value, buf).map_err(|e| location.annotate(e))?;
    }

    Ok(())
}

pub(crate) fn container_fields<'a>(
    container: &'a Container,
    values: &'a [Value],
) -> Result<impl Iterator<Item = (&'a Field, &'a Value)>, Error> {
    if values.len() != container.fields().len() {
        return Err(Error::value_mismatch("container"));
    }

    Ok(container.fields().iter().zip(values))
}

pub(crate) fn union_variant<'a, 'b>(
    union: &'a Union,
    selector: u8,
    value: Option<&'b Value>,
) -> Result<(&'a crate::Variant, Option<&'b Value>), Error> {
    let selector = UnionSelector::new(selector)?.check_variant_count(union.variants().len())?;
    let variant = &union.variants()[u8::from(selector) as usize];
    Ok((variant, value))
}

/// Decodes `bytes` into a `Value` of `schema`.
///
/// Pointers decode to their referent's value (never `Value::Null`).
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Value, Error> {
    match schema {
        Schema::Pointer(referent) => decode(referent, bytes),
        Schema::Overlay(overlay) => decode_overlay(overlay, bytes),
        Schema::Bool => bool::from_ssz_bytes(bytes).map(Value::Bool),
        Schema::Byte => u8::from_ssz_bytes(bytes).map(Value::Byte),
        Schema::Uint(size) => {
            if bytes.len() != size.bytes() {
                Err(Error::size_violation(bytes.len(), size.bytes()))
            } else {
                Ok(Value::Uint(U256::from_little_endian(bytes)))
            }
        }
        Schema::Vector { element, len } => {
            if element.is_byte() {
                check_vector_len(bytes.len(), *len)?;
                Ok(Value::Bytes(bytes.to_vec()))
            } else {
                decode_vector_with(bytes, *len, element.fixed_size(), |item| {
                    decode(element, item)
                })
                .map(Value::Sequence)
            }
        }
        Schema::List { element, max_len } => {
            if element.is_byte() {
                check_list_len(bytes.len(), *max_len)?;
                Ok(Value::Bytes(bytes.to_vec()))
            } else if element.is_variable_size() {
                decode_variable_length_items_with(bytes, Some(*max_len), |item| {
                    decode(element, item)
                })
                .map(Value::Sequence)
            } else {
                decode_fixed_length_items_with(
                    bytes,
                    element.fixed_size(),
                    Some(*max_len),
                    |item| decode(element, item),
                )
                .map(Value::Sequence)
            }
        }
        Schema::Container(container) => decode_container(container, bytes),
        Schema::Union(union) => {
            let (selector, body) = split_union_bytes(bytes)?;
            let selector = selector.check_variant_count(union.variants().len())?;
            let variant = &union.variants()[u8::from(selector) as usize];

            let value = match &variant.schema {
                Some(schema) => Some(Box::new(
                    decode(schema, body).map_err(|e| e.in_field(&variant.name))?,
                )),
                None if body.is_empty() => None,
                None => return Err(Error::size_violation(body.len(), 0)),
            };

            Ok(Value::Union {
                selector: selector.into(),
                value,
            })
        }
    }
}

fn decode_overlay(overlay: &Overlay, bytes: &[u8]) -> Result<Value, Error> {
    match overlay.kind() {
        OverlayKind::Plain => decode(overlay.underlying(), bytes),
        OverlayKind::Bitlist { max_bits } => {
            Bitlist::from_raw_bytes(bytes, max_bits).map(|b| Value::Bytes(b.into_raw_bytes()))
        }
        OverlayKind::Bitvector { bits } => {
            Bitvector::from_raw_bytes(bytes, bits).map(|b| Value::Bytes(b.into_raw_bytes()))
        }
    }
}

fn decode_container(container: &Container, bytes: &[u8]) -> Result<Value, Error> {
    let fixed_region_len = container.fixed_region_len();
    if bytes.len() < fixed_region_len {
        return Err(Error::size_violation(bytes.len(), fixed_region_len));
    }

    let mut builder = SszDecoderBuilder::new(bytes);
    for field in container.fields() {
        builder
            .register_type_parameterized(
                !field.schema.is_variable_size(),
                field.schema.ssz_fixed_len(),
            )?;
    }

    let mut decoder = builder.build()?;

    container
        .fields()
        .iter()
        .map(|field| {
            decoder
                .decode_next_with(|slice| decode(&field.schema, slice))
                .map_err(|e| e.in_field(&field.name))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;
    use ssz::OffsetError;

    fn uint64() -> Schema {
        Schema::Uint(UintSize::U64)
    }

    fn round_trip(schema: &Schema, value: Value) -> Vec<u8> {
        let bytes = encode(schema, &value).unwrap();
        assert_eq!(size_of(schema, &value), Ok(bytes.len()));
        assert_eq!(decode(schema, &bytes), Ok(value));
        bytes
    }

    #[test]
    fn basic_values() {
        assert_eq!(round_trip(&Schema::Bool, Value::Bool(true)), vec![1]);
        assert_eq!(round_trip(&Schema::Byte, Value::Byte(7)), vec![7]);
        assert_eq!(
            round_trip(&Schema::Uint(UintSize::U16), Value::uint(0x0102)),
            vec![2, 1]
        );
        assert_eq!(
            round_trip(&Schema::Uint(UintSize::U256), Value::uint(1)).len(),
            32
        );

        assert!(matches!(
            decode(&Schema::Bool, &[2]).unwrap_err().kind(),
            ErrorKind::BytesInvalid(_)
        ));
    }

    #[test]
    fn uint_overflow() {
        assert_eq!(
            encode(&Schema::Uint(UintSize::U8), &Value::uint(256)),
            Err(Error::size_violation(2, 1))
        );
        assert_eq!(
            size_of(&Schema::Uint(UintSize::U16), &Value::uint(1 << 16)),
            Err(Error::size_violation(3, 2))
        );
        assert!(encode(&Schema::Uint(UintSize::U16), &Value::uint(u16::MAX as u64)).is_ok());
    }

    #[test]
    fn value_mismatch() {
        assert_eq!(
            encode(&Schema::Bool, &Value::Byte(1)),
            Err(Error::value_mismatch("bool"))
        );
        assert_eq!(
            encode(
                &Schema::vector(Schema::Byte, 2).unwrap(),
                &Value::Sequence(vec![Value::Byte(1), Value::Byte(2)])
            ),
            Err(Error::value_mismatch("bytes"))
        );
        assert_eq!(
            encode(&Schema::Bool, &Value::Null),
            Err(Error::value_mismatch("bool"))
        );
    }

    #[test]
    fn byte_vectors_and_lists() {
        let vector = Schema::vector(Schema::Byte, 4).unwrap();
        round_trip(&vector, Value::Bytes(vec![1, 2, 3, 4]));
        assert_eq!(
            encode(&vector, &Value::Bytes(vec![1, 2, 3])),
            Err(Error::size_violation(3, 4))
        );
        assert_eq!(
            decode(&vector, &[1, 2, 3, 4, 5]),
            Err(Error::size_violation(5, 4))
        );

        let list = Schema::list(Schema::Byte, 4).unwrap();
        round_trip(&list, Value::Bytes(vec![]));
        round_trip(&list, Value::Bytes(vec![1, 2, 3, 4]));
        assert_eq!(
            encode(&list, &Value::Bytes(vec![0; 5])),
            Err(Error::max_size_violation(5, 4))
        );
        assert_eq!(
            decode(&list, &[0; 5]),
            Err(Error::max_size_violation(5, 4))
        );
    }

    #[test]
    fn list_of_uint() {
        let list = Schema::list(Schema::Uint(UintSize::U16), 3).unwrap();
        let value = Value::Sequence(vec![Value::uint(1), Value::uint(2), Value::uint(3)]);
        assert_eq!(round_trip(&list, value), vec![1, 0, 2, 0, 3, 0]);

        assert_eq!(
            decode(&list, &[1, 0, 2]).unwrap_err().kind(),
            &ErrorKind::AlignmentViolation {
                len: 3,
                element_size: 2
            }
        );
        assert_eq!(
            decode(&list, &[0; 8]),
            Err(Error::max_size_violation(4, 3))
        );
    }

    #[test]
    fn list_of_lists() {
        let inner = Schema::list(Schema::Byte, 3).unwrap();
        let outer = Schema::list(inner, 2).unwrap();

        let value = Value::Sequence(vec![Value::Bytes(vec![1, 2]), Value::Bytes(vec![3])]);
        assert_eq!(
            round_trip(&outer, value),
            vec![8, 0, 0, 0, 10, 0, 0, 0, 1, 2, 3]
        );
        round_trip(&outer, Value::Sequence(vec![]));
        round_trip(&outer, Value::Sequence(vec![Value::Bytes(vec![])]));

        // An inner list exceeding its maximum is reported at its index.
        let e = encode(
            &outer,
            &Value::Sequence(vec![Value::Bytes(vec![]), Value::Bytes(vec![0; 4])]),
        )
        .unwrap_err();
        assert_eq!(e.to_string(), "[1]: max size violation: got 4, max is 3");

        // An offset table which is not a multiple of four.
        assert_eq!(
            decode(&outer, &[5, 0, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(5).into())
        );
    }

    #[test]
    fn pointers() {
        let schema = Schema::container(
            "Foo",
            vec![
                Field::new("a", Schema::pointer(uint64())),
                Field::new("b", Schema::pointer(Schema::list(Schema::Byte, 4).unwrap())),
            ],
        )
        .unwrap();

        let null = Value::Container(vec![Value::Null, Value::Null]);
        let bytes = encode(&schema, &null).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0]);
        assert_eq!(size_of(&schema, &null), Ok(12));

        // Nulls are decoded as the default of the referent.
        assert_eq!(
            decode(&schema, &bytes),
            Ok(Value::Container(vec![Value::uint(0), Value::Bytes(vec![])]))
        );
    }

    #[test]
    fn unions() {
        let schema = Schema::union(
            "Option",
            vec![
                Variant::new("None", None),
                Variant::new("Some", Some(uint64())),
            ],
        )
        .unwrap();

        assert_eq!(round_trip(&schema, Value::union(0, None)), vec![0]);
        assert_eq!(
            round_trip(&schema, Value::union(1, Some(Value::uint(5)))),
            vec![1, 5, 0, 0, 0, 0, 0, 0, 0]
        );

        assert_eq!(
            decode(&schema, &[2]).unwrap_err().kind(),
            &ErrorKind::UnionSelectorInvalid(2)
        );
        assert_eq!(
            encode(&schema, &Value::union(128, None)).unwrap_err().kind(),
            &ErrorKind::UnionSelectorInvalid(128)
        );
        assert_eq!(decode(&schema, &[]), Err(Error::size_violation(0, 1)));
        assert_eq!(decode(&schema, &[0, 1]), Err(Error::size_violation(1, 0)));
        assert_eq!(
            decode(&schema, &[1, 0]).unwrap_err().to_string(),
            "Some: size violation: got 1, expected 8"
        );
    }

    #[test]
    fn bitfields() {
        let bitlist = Schema::bitlist("Bits", 8).unwrap();
        round_trip(&bitlist, Value::Bytes(vec![0b0000_0001]));
        round_trip(&bitlist, Value::Bytes(vec![0xff, 0b0000_0001]));

        assert_eq!(decode(&bitlist, &[]).unwrap_err().kind(), &ErrorKind::EmptyBitlist);
        assert_eq!(
            decode(&bitlist, &[0xff, 0b0000_0010]),
            Err(Error::max_size_violation(9, 8))
        );
        assert_eq!(
            encode(&bitlist, &Value::Bytes(vec![0xff, 0b0000_0010])),
            Err(Error::max_size_violation(9, 8))
        );

        let bitvector = Schema::bitvector("Bits", 12).unwrap();
        round_trip(&bitvector, Value::Bytes(vec![0xff, 0x0f]));
        assert_eq!(
            decode(&bitvector, &[0xff]),
            Err(Error::size_violation(1, 2))
        );
    }

    #[test]
    fn container_offsets() {
        let schema = Schema::container(
            "Foo",
            vec![
                Field::new("a", Schema::list(Schema::Byte, 8).unwrap()),
                Field::new("b", Schema::Bool),
                Field::new("c", Schema::list(Schema::Byte, 8).unwrap()),
            ],
        )
        .unwrap();

        let value = Value::Container(vec![
            Value::Bytes(vec![1, 2]),
            Value::Bool(true),
            Value::Bytes(vec![3]),
        ]);
        let bytes = round_trip(&schema, value);
        assert_eq!(bytes, vec![9, 0, 0, 0, 1, 11, 0, 0, 0, 1, 2, 3]);

        let mut skipping = bytes.clone();
        skipping[0] = 10;
        assert_eq!(
            decode(&schema, &skipping),
            Err(OffsetError::SkipsVariableBytes(10).into())
        );

        let mut decreasing = bytes.clone();
        decreasing[5] = 8;
        assert_eq!(
            decode(&schema, &decreasing),
            Err(OffsetError::Decreasing(8).into())
        );

        let mut out_of_bounds = bytes;
        out_of_bounds[5] = 13;
        assert_eq!(
            decode(&schema, &out_of_bounds),
            Err(OffsetError::OutOfBounds(13).into())
        );

        assert_eq!(
            decode(&schema, &[9, 0, 0, 0, 1, 9, 0]),
            Err(Error::size_violation(7, 9))
        );
    }
}
