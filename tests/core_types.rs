use detpost::{
    Attribute, DetPostError, ErrorKind, OwnedTensor, PostprocessConfig, Postprocessor, RawTensor,
    Rescale,
};

#[test]
fn raw_tensor_rejects_wrong_row_count() {
    let data = [0.0f32; 12];
    let err = RawTensor::new(&data, 4, 3).err().unwrap();
    assert_eq!(
        err,
        DetPostError::InvalidRows {
            rows: 4,
            expected: 5,
        }
    );
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn raw_tensor_rejects_length_mismatch() {
    let data = [0.0f32; 14];
    let err = RawTensor::from_anchors(&data, 3).err().unwrap();
    assert_eq!(
        err,
        DetPostError::LengthMismatch {
            rows: 5,
            cols: 3,
            needed: 15,
            len: 14,
        }
    );

    // Extra trailing values are not silently ignored either.
    let data = [0.0f32; 16];
    assert!(RawTensor::from_anchors(&data, 3).is_err());
}

#[test]
fn raw_tensor_rejects_empty_and_bad_rank() {
    let empty: [f32; 0] = [];
    let err = RawTensor::from_anchors(&empty, 0).err().unwrap();
    assert_eq!(err, DetPostError::NoAnchors);

    let data = [0.0f32; 10];
    let err = RawTensor::from_shape(&data, &[10]).err().unwrap();
    assert_eq!(
        err,
        DetPostError::UnsupportedShape {
            shape: vec![10],
            reason: "expected rank 2 or 3",
        }
    );
}

#[test]
fn model_output_shape_with_batch_is_accepted() {
    let anchors = 8400;
    let data = vec![0.25f32; 5 * anchors];
    let tensor = RawTensor::from_shape(&data, &[1, 5, anchors]).unwrap();
    assert_eq!(tensor.num_anchors(), anchors);
    assert_eq!(tensor.row(Attribute::Confidence).len(), anchors);

    let owned = OwnedTensor::from_shape(data.clone(), &[5, anchors]).unwrap();
    assert_eq!(owned.view().as_slice(), data.as_slice());
}

#[test]
fn config_errors_surface_at_call_entry() {
    let tensor = OwnedTensor::from_records(&[[0.5, 0.5, 0.1, 0.1, 0.9]]).unwrap();

    let cases = [
        PostprocessConfig {
            confidence_threshold: -0.1,
            ..PostprocessConfig::default()
        },
        PostprocessConfig {
            iou_threshold: 2.0,
            ..PostprocessConfig::default()
        },
        PostprocessConfig {
            max_output_size: 0,
            ..PostprocessConfig::default()
        },
        PostprocessConfig::default().with_rescale(Rescale::from_square_model(
            640.0,
            f32::INFINITY,
            480.0,
        )),
    ];
    for cfg in cases {
        let err = Postprocessor::new()
            .with_config(cfg)
            .run(tensor.view())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{err}");
    }
}

#[test]
fn boundary_thresholds_are_valid() {
    let cfg = PostprocessConfig {
        confidence_threshold: 0.0,
        iou_threshold: 1.0,
        max_output_size: 1,
        ..PostprocessConfig::default()
    };
    assert!(cfg.validate().is_ok());
    let cfg = PostprocessConfig {
        confidence_threshold: 1.0,
        iou_threshold: 0.0,
        ..PostprocessConfig::default()
    };
    assert!(cfg.validate().is_ok());
}
