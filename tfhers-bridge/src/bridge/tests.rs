use super::*;
use crate::dtypes::{CryptoParams, TfhersIntegerType};
use crate::error::KeysetError;
use crate::module::{
    FunctionGraph, KeysetInfo, LweSecretKeyParam, Module, ProgramInfo, Shape, ValueType,
};
use std::cell::Cell;
use tfhe::core_crypto::prelude::{EncryptionKeyChoice, LweDimension};

const PARAMS: CryptoParams = CryptoParams::PARAM_MESSAGE_2_CARRY_2_KS_PBS_GAUSSIAN_2M128;

/// What the exporter was asked to import
#[derive(Debug, PartialEq)]
struct Imported {
    buffer: Vec<u8>,
    description: FheIntDescription,
    key_id: KeyId,
    variance: f64,
    shape: Vec<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("refused by the exporter")]
struct Refused;

#[derive(Default)]
struct RecordingExporter {
    calls: Cell<usize>,
    refuse: bool,
}

impl TfhersExporter for RecordingExporter {
    type Value = Imported;
    type Error = Refused;

    fn import_int(
        &self,
        buffer: &[u8],
        description: &FheIntDescription,
        key_id: KeyId,
        variance: f64,
        shape: &[usize],
    ) -> std::result::Result<Imported, Refused> {
        self.calls.set(self.calls.get() + 1);
        if self.refuse {
            return Err(Refused);
        }
        Ok(Imported {
            buffer: buffer.to_vec(),
            description: *description,
            key_id,
            variance,
            shape: shape.to_vec(),
        })
    }

    fn export_int(
        &self,
        value: &Imported,
        description: &FheIntDescription,
    ) -> std::result::Result<Vec<u8>, Refused> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(&value.description, description);
        Ok(value.buffer.clone())
    }
}

fn encrypted(bit_width: usize) -> ValueType {
    ValueType::Encrypted {
        is_signed: false,
        bit_width,
    }
}

fn small_key_params() -> CryptoParams {
    CryptoParams {
        encryption_key_choice: EncryptionKeyChoice::Small,
        ..PARAMS
    }
}

fn keyset_info() -> KeysetInfo {
    KeysetInfo::new(vec![
        LweSecretKeyParam::new(LweDimension(64)),
        LweSecretKeyParam::new(LweDimension(32)),
    ])
}

/// `main(tfhers uint8 [2, 3], encrypted) -> (encrypted, tfhers int16)`
fn single_function_module() -> Module {
    let graph = FunctionGraph::new("main")
        .input(
            ValueType::Tfhers(TfhersIntegerType::uint8_2_2(PARAMS)),
            vec![2, 3],
        )
        .input(encrypted(8), Shape::new())
        .output(encrypted(8), Shape::new())
        .output(
            ValueType::Tfhers(TfhersIntegerType::int16_2_2(small_key_params())),
            Shape::new(),
        );
    let program_info = ProgramInfo::new(keyset_info()).with_circuit("main", [Some(0), Some(1)]);

    Module::new(vec![graph], program_info)
}

fn two_functions_module() -> Module {
    let inc = FunctionGraph::new("inc")
        .input(ValueType::Tfhers(TfhersIntegerType::uint8_2_2(PARAMS)), Shape::new())
        .output(ValueType::Tfhers(TfhersIntegerType::uint8_2_2(PARAMS)), Shape::new());
    let dec = FunctionGraph::new("dec")
        .input(ValueType::Tfhers(TfhersIntegerType::uint8_2_2(PARAMS)), Shape::new())
        .input(
            ValueType::Clear {
                is_signed: false,
                bit_width: 8,
            },
            Shape::new(),
        )
        .output(ValueType::Tfhers(TfhersIntegerType::uint8_2_2(PARAMS)), Shape::new());
    let program_info = ProgramInfo::new(keyset_info())
        .with_circuit("inc", [Some(0)])
        .with_circuit("dec", [Some(0), None]);

    Module::new(vec![inc, dec], program_info)
}

#[test]
fn test_signature_table_marks_tfhers_slots() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    let signature = bridge.signatures().function("main").unwrap();
    assert_eq!(signature.inputs().len(), 2);
    assert_eq!(signature.outputs().len(), 2);

    let input = signature.inputs()[0].as_ref().unwrap();
    assert_eq!(input.ty, TfhersIntegerType::uint8_2_2(PARAMS));
    assert_eq!(input.shape, vec![2, 3]);
    assert!(signature.inputs()[1].is_none());
    assert!(signature.outputs()[0].is_none());
    assert!(signature.outputs()[1].is_some());
}

#[test]
fn test_default_function() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());
    assert_eq!(bridge.default_function(), Some("main"));
    assert_eq!(bridge.function_names().collect::<Vec<_>>(), ["main"]);

    let module = two_functions_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());
    assert_eq!(bridge.default_function(), None);
    assert_eq!(bridge.function_names().collect::<Vec<_>>(), ["inc", "dec"]);
}

#[test]
fn test_positional_and_named_addresses_agree() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    for index in 0..2usize {
        assert_eq!(
            bridge.input_slot(index).unwrap(),
            bridge.input_slot(("main", index)).unwrap()
        );
        assert_eq!(
            bridge.input_key_id(index).unwrap(),
            bridge.input_key_id(("main", index)).unwrap()
        );
    }
    assert_eq!(
        bridge.output_description(1usize).unwrap(),
        bridge.output_description(("main".to_owned(), 1usize)).unwrap()
    );
}

#[test]
fn test_missing_function_name_names_the_operation() {
    let module = two_functions_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    let err = bridge.input_description(0usize).unwrap_err();
    assert!(matches!(
        &err,
        Error::MissingFunctionName {
            operation: "input_description",
            address: SlotAddress::Positional(0),
        }
    ));
    let message = err.to_string();
    assert!(message.contains("'input_description'"));
    assert!(message.contains("('my_func', 1)"));

    assert!(matches!(
        bridge.serialize_input_secret_key(1usize),
        Err(Error::MissingFunctionName {
            operation: "serialize_input_secret_key",
            ..
        })
    ));
}

#[test]
fn test_lookup_errors() {
    let module = two_functions_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    assert!(matches!(
        bridge.input_slot(("mul", 0usize)),
        Err(Error::UnknownFunction(name)) if name == "mul"
    ));
    assert!(matches!(
        bridge.output_slot(("inc", 1usize)),
        Err(Error::SlotOutOfRange {
            kind: SlotKind::Output,
            index: 1,
            count: 1,
            ..
        })
    ));
    assert!(matches!(
        bridge.input_description(("dec", 1usize)),
        Err(Error::NotTfhersValue {
            kind: SlotKind::Input,
            index: 1,
            ..
        })
    ));
    assert!(matches!(
        bridge.input_key_id(("dec", 1usize)),
        Err(Error::Keyset(KeysetError::ClearInput { index: 1, .. }))
    ));
}

#[test]
fn test_import_value_passes_resolved_parameters() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    let imported = bridge.import_value(&[1, 2, 3], 0usize).unwrap();

    assert_eq!(imported.buffer, vec![1, 2, 3]);
    assert_eq!(
        imported.description,
        FheIntDescription::from_type(&TfhersIntegerType::uint8_2_2(PARAMS))
    );
    assert_eq!(imported.key_id, 0);
    assert_eq!(imported.variance, PARAMS.encryption_variance());
    assert_eq!(imported.shape, vec![2, 3]);
}

#[test]
fn test_non_tfhers_values_never_reach_the_exporter() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    assert!(matches!(
        bridge.import_value(&[], 1usize),
        Err(Error::NotTfhersValue { .. })
    ));

    let value = bridge.import_value(&[7], 0usize).unwrap();
    assert!(matches!(
        bridge.export_value(&value, 0usize),
        Err(Error::NotTfhersValue {
            kind: SlotKind::Output,
            index: 0,
            ..
        })
    ));
    assert_eq!(bridge.exporter().calls.get(), 1);
}

#[test]
fn test_exporter_errors_are_kept_as_source() {
    let module = single_function_module();
    let exporter = RecordingExporter {
        refuse: true,
        ..Default::default()
    };
    let bridge = Bridge::new(&module, exporter);

    let err = bridge.import_value(&[0], 0usize).unwrap_err();
    assert!(matches!(err, Error::Exporter(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "refused by the exporter");
}

#[test]
fn test_export_uses_output_description() {
    let module = single_function_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    let description = bridge.output_description(1usize).unwrap();
    assert!(description.is_signed);
    assert!(!description.ks_first);

    let value = Imported {
        buffer: vec![4, 2],
        description,
        key_id: 1,
        variance: 0.0,
        shape: Vec::new(),
    };
    assert_eq!(bridge.export_value(&value, 1usize).unwrap(), vec![4, 2]);
}

#[test]
fn test_keygen_with_unresolvable_entry_generates_nothing() {
    let module = two_functions_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    let key = LweSecretKeyOwned::new_empty_key(0u64, LweDimension(64));
    let bytes = serialize_secret_key(&key).unwrap();

    let err = bridge
        .keygen_with_initial_keys([(SlotAddress::Positional(0), bytes)], KeygenConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingFunctionName {
            operation: "keygen_with_initial_keys",
            ..
        }
    ));
    assert!(!module.is_keygen_done());
}

#[test]
fn test_keygen_without_initial_keys() {
    let module = two_functions_module();
    let bridge = Bridge::new(&module, RecordingExporter::default());

    assert!(matches!(
        bridge.serialize_input_secret_key(("inc", 0usize)),
        Err(Error::Keyset(KeysetError::KeysNotGenerated))
    ));

    bridge.keygen(KeygenConfig::default()).unwrap();

    let inc = bridge.serialize_input_secret_key(("inc", 0usize)).unwrap();
    let dec = bridge.serialize_input_secret_key(("dec", 0usize)).unwrap();
    assert!(!inc.is_empty());
    assert_eq!(inc, dec);
}
