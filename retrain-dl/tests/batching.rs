mod common;

use common::{make_dataset, BLUE, RED};
use retrain_dl::{
    batch::{BatchIteratorInit, LabelMode, Labels},
    dataset::{Category, ImageLists},
    generator::Resilient,
    processor::symmetric_unit_scale,
};
use std::{fs, sync::Arc, thread};

#[test]
fn batches_have_the_requested_shape() {
    let root = make_dataset(&[("apples", RED, 12), ("plums", BLUE, 12)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 8,
        shuffle: false,
        ..BatchIteratorInit::new(root.path(), (16, 16))
    }
    .build(&lists, Category::Training)
    .unwrap();

    assert_eq!(iterator.num_samples(), 24);
    assert_eq!(iterator.num_classes(), 2);

    let batch = iterator.next_batch().unwrap();
    assert_eq!(batch.images.dim(), (8, 16, 16, 3));
    match batch.labels.unwrap() {
        Labels::Categorical(one_hot) => assert_eq!(one_hot.dim(), (8, 2)),
        _ => unreachable!(),
    }
}

#[test]
fn final_batch_of_an_epoch_is_truncated() {
    let root = make_dataset(&[("apples", RED, 10)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 4,
        shuffle: false,
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    let sizes: Vec<_> = (0..4)
        .map(|_| iterator.next_batch().unwrap())
        .map(|batch| batch.images.dim().0)
        .collect();
    assert_eq!(sizes, vec![4, 4, 2, 4]);
}

#[test]
fn one_hot_labels_match_the_source_class() {
    // apples are red, plums are blue; colors identify the class after decode
    let root = make_dataset(&[("apples", RED, 10), ("plums", BLUE, 10)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 5,
        seed: Some(1),
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    for _ in 0..4 {
        let batch = iterator.next_batch().unwrap();
        let one_hot = match batch.labels.unwrap() {
            Labels::Categorical(array) => array,
            _ => unreachable!(),
        };

        for (slot, row) in one_hot.outer_iter().enumerate() {
            assert_eq!(row.sum(), 1.0);
            let class = row.iter().position(|&value| value == 1.0).unwrap();

            let red = batch.images[(slot, 4, 4, 0)];
            let blue = batch.images[(slot, 4, 4, 2)];
            // class 0 is "apples" (ascending label order)
            if class == 0 {
                assert!(red > blue);
            } else {
                assert!(blue > red);
            }
        }
    }
}

#[test]
fn normalization_is_applied_per_sample() {
    let root = make_dataset(&[("apples", RED, 6)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 3,
        normalize: Some(symmetric_unit_scale()),
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    let batch = iterator.next_batch().unwrap();
    assert!(batch
        .images
        .iter()
        .all(|&value| (-1.0..=1.0).contains(&value)));
}

#[test]
fn empty_category_fails_at_construction() {
    let root = make_dataset(&[("apples", RED, 10)]);
    // nothing is assigned to validation at 0 percent
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let err = BatchIteratorInit::new(root.path(), (8, 8))
        .build(&lists, Category::Validation)
        .unwrap_err();
    assert!(err.to_string().contains("no images"));
}

#[test]
fn sparse_labels_are_class_indexes() {
    let root = make_dataset(&[("apples", RED, 4), ("plums", BLUE, 4)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 8,
        shuffle: false,
        label_mode: LabelMode::Sparse,
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    match iterator.next_batch().unwrap().labels.unwrap() {
        Labels::Sparse(classes) => {
            assert_eq!(classes.to_vec(), vec![0, 0, 0, 0, 1, 1, 1, 1]);
        }
        _ => unreachable!(),
    }
}

#[test]
fn image_only_batches_carry_no_labels() {
    let root = make_dataset(&[("apples", RED, 4)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 2,
        label_mode: LabelMode::None,
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    assert!(iterator.next_batch().unwrap().labels.is_none());
}

#[test]
fn concurrent_pulls_share_one_iterator() {
    let root = make_dataset(&[("apples", RED, 32), ("plums", BLUE, 32)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = Arc::new(
        BatchIteratorInit {
            batch_size: 8,
            seed: Some(3),
            ..BatchIteratorInit::new(root.path(), (8, 8))
        }
        .build(&lists, Category::Training)
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let iterator = iterator.clone();
            thread::spawn(move || {
                (0..4)
                    .map(|_| iterator.next_batch().unwrap().images.dim().0)
                    .sum::<usize>()
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|handle| handle.join().unwrap()).sum();
    // 16 batches of 8 over 64 samples: two full epochs, no index lost
    assert_eq!(total, 128);
}

#[test]
fn resilient_batches_survive_a_broken_file() {
    let root = make_dataset(&[("apples", RED, 6)]);
    let lists = ImageLists::index(root.path(), 0.0).unwrap();

    let iterator = BatchIteratorInit {
        batch_size: 2,
        shuffle: false,
        ..BatchIteratorInit::new(root.path(), (8, 8))
    }
    .build(&lists, Category::Training)
    .unwrap();

    // corrupt one file after the index was built
    let record = lists.get("apples").unwrap();
    let victim = root.path().join(&record.dir).join(&record.training[0]);
    fs::write(victim, b"junk").unwrap();

    let batches: Vec<_> = Resilient::new(Arc::new(iterator).batches())
        .take(4)
        .collect();
    assert_eq!(batches.len(), 4);
    assert!(batches.iter().all(|batch| batch.images.dim().0 == 2));
}
