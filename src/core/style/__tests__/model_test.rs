use std::sync::Arc;

use crate::core::error::StyleError;
use crate::core::extractor::FeatureExtractor;
use crate::core::style::{gram_matrix, StyleContentModel, TargetBundle};
use crate::core::test_support::{shallow_model, shallow_vgg, synthetic_image, to_vec};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn 모델_출력_분할_테스트() {
    let model = shallow_model(5);
    let image = synthetic_image(16, 12, 1);
    let out = model.evaluate(&image).unwrap();

    assert_eq!(out.style.len(), 2);
    assert_eq!(out.content.len(), 1);
    assert_eq!(out.style["block1_conv1"].dims(), &[1, 64, 64]);
    assert_eq!(out.style["block2_conv1"].dims(), &[1, 128, 128]);
    assert_eq!(out.content["block2_conv2"].dims(), &[1, 8, 6, 128]);

    println!("✅ 모델 출력 분할 테스트 통과");
}

#[test]
fn 스타일은_gram_콘텐츠는_원본_테스트() {
    let vgg = shallow_vgg(5);
    let model = StyleContentModel::new(
        vgg.clone(),
        names(&["block1_conv1"]),
        names(&["block1_conv1"]),
    )
    .unwrap();
    let image = synthetic_image(8, 8, 2);

    let out = model.evaluate(&image).unwrap();
    let raw = vgg.extract(&image, &names(&["block1_conv1"])).unwrap().remove(0);

    // 같은 레이어라도 스타일 쪽은 Gram, 콘텐츠 쪽은 활성값 그대로
    assert_eq!(to_vec(&out.content["block1_conv1"]), to_vec(&raw));
    assert_eq!(to_vec(&out.style["block1_conv1"]), to_vec(&gram_matrix(&raw).unwrap()));
}

#[test]
fn 잘못된_레이어_이름은_생성시_실패_테스트() {
    let result = StyleContentModel::new(shallow_vgg(1), names(&["block1_conv1", "conv99"]), names(&["block2_conv2"]));
    match result {
        Err(StyleError::InvalidLayerName(name)) => assert_eq!(name, "conv99"),
        other => panic!("InvalidLayerName 기대: {:?}", other.map(|_| ())),
    }
}

#[test]
fn 빈_레이어와_중복_레이어_거부_테스트() {
    assert!(matches!(
        StyleContentModel::new(shallow_vgg(1), vec![], names(&["block2_conv2"])),
        Err(StyleError::InvalidConfig(_))
    ));
    assert!(matches!(
        StyleContentModel::new(
            shallow_vgg(1),
            names(&["block1_conv1", "block1_conv1"]),
            names(&["block2_conv2"])
        ),
        Err(StyleError::InvalidConfig(_))
    ));
}

#[test]
fn 타깃_번들_출처_테스트() {
    let model = shallow_model(9);
    let content = synthetic_image(12, 12, 3);
    let style = synthetic_image(10, 14, 4);

    let targets = TargetBundle::compute(&model, &content, &style).unwrap();

    // 스타일 통계는 스타일 이미지에서, 콘텐츠 활성값은 콘텐츠 이미지에서
    let from_style = model.evaluate(&style).unwrap();
    let from_content = model.evaluate(&content).unwrap();
    assert_eq!(
        to_vec(&targets.style()["block1_conv1"]),
        to_vec(&from_style.style["block1_conv1"])
    );
    assert_eq!(
        to_vec(&targets.content()["block2_conv2"]),
        to_vec(&from_content.content["block2_conv2"])
    );
    assert_eq!(targets.content()["block2_conv2"].dims(), &[1, 6, 6, 128]);
}

#[test]
fn 모델_복제는_추출기_공유_테스트() {
    let vgg = shallow_vgg(2);
    let model = StyleContentModel::new(vgg.clone(), names(&["block1_conv1"]), names(&["block1_conv2"])).unwrap();
    let copy = model.clone();
    // 원본 + 모델 + 복제본
    assert_eq!(Arc::strong_count(&vgg), 3);
    assert_eq!(copy.style_layers(), model.style_layers());
}
