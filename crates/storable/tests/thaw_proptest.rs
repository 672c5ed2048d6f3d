use proptest::prelude::*;
use storable::{thaw, StorableValue};

/// Wire-level scalar used to assemble generated documents.
#[derive(Debug, Clone)]
enum Scalar {
    Byte(i8),
    Integer(i64),
    Double(f64),
    Ascii(String),
}

impl Scalar {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Scalar::Byte(v) => out.extend_from_slice(&[0x08, (*v as i16 + 128) as u8]),
            Scalar::Integer(v) => {
                out.push(0x06);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Scalar::Double(v) => {
                out.push(0x07);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Scalar::Ascii(s) => {
                out.push(0x0a);
                out.push(s.len() as u8);
                out.extend_from_slice(s.as_bytes());
            }
        }
    }

    fn expected(&self) -> StorableValue {
        match self {
            Scalar::Byte(v) => StorableValue::Integer(*v as i64),
            Scalar::Integer(v) => StorableValue::Integer(*v),
            Scalar::Double(v) => StorableValue::Double(*v),
            Scalar::Ascii(s) => StorableValue::Str(s.clone()),
        }
    }
}

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i8>().prop_map(Scalar::Byte),
        any::<i64>().prop_map(Scalar::Integer),
        // Finite doubles only: NaN never compares equal to itself.
        proptest::num::f64::NORMAL.prop_map(Scalar::Double),
        "[ -~]{0,40}".prop_map(Scalar::Ascii),
    ]
}

fn frozen_array(scalars: &[Scalar]) -> Vec<u8> {
    let mut data = vec![0x04, 0x0b, 0x08];
    data.extend_from_slice(b"12345678");
    data.extend_from_slice(&[0x04, 0x08, 0x08, 0x08]);
    data.push(0x02);
    data.extend_from_slice(&(scalars.len() as u32).to_le_bytes());
    for scalar in scalars {
        scalar.encode(&mut data);
    }
    data
}

proptest! {
    /// Any conformantly-encoded document decodes to the value it encodes.
    #[test]
    fn decodes_generated_documents(scalars in prop::collection::vec(scalar_strategy(), 0..32)) {
        let data = frozen_array(&scalars);
        let expected = StorableValue::Array(scalars.iter().map(Scalar::expected).collect());
        prop_assert_eq!(thaw(&data).unwrap(), expected);
    }

    /// Decoding the same buffer twice yields deeply-equal results.
    #[test]
    fn decode_is_idempotent(scalars in prop::collection::vec(scalar_strategy(), 0..32)) {
        let data = frozen_array(&scalars);
        prop_assert_eq!(thaw(&data).unwrap(), thaw(&data).unwrap());
    }

    /// Truncating a valid document inside the body never yields a value:
    /// the declared element count can no longer be satisfied.
    #[test]
    fn truncation_never_yields_a_value(
        scalars in prop::collection::vec(scalar_strategy(), 1..16),
        cut in 1usize..64,
    ) {
        let data = frozen_array(&scalars);
        let cut = cut.min(data.len() - 16); // keep the header intact
        let truncated = &data[..data.len() - cut];
        prop_assert!(thaw(truncated).is_err());
    }
}
