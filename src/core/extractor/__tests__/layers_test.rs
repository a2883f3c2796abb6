use crate::core::extractor::layers::*;

#[test]
fn vgg19_레이어_표_구성_테스트() {
    let layers = vgg19_layers();

    // 합성곱 16개 + 풀링 5개
    assert_eq!(layers.len(), 21);
    assert_eq!(layers.iter().filter(|l| l.is_conv()).count(), 16);

    assert_eq!(layers[0].name, "block1_conv1");
    assert_eq!(layers[0].feature_index, 0);
    assert_eq!(layers[2].name, "block1_pool");
    assert_eq!(layers[2].feature_index, 4);
    assert_eq!(layers.last().unwrap().name, "block5_pool");
    assert_eq!(layers.last().unwrap().feature_index, 36);

    println!("✅ VGG19 레이어 표 구성 테스트 통과");
}

#[test]
fn torchvision_가중치_인덱스_테스트() {
    let layers = vgg19_layers();
    let index_of = |name: &str| layers.iter().find(|l| l.name == name).unwrap().feature_index;

    assert_eq!(index_of("block2_conv1"), 5);
    assert_eq!(index_of("block3_conv1"), 10);
    assert_eq!(index_of("block4_conv1"), 19);
    assert_eq!(index_of("block5_conv1"), 28);
    assert_eq!(index_of("block5_conv2"), 30);

    let conv = layers.iter().find(|l| l.name == "block3_conv1").unwrap();
    assert_eq!(conv.weight_key(), "features.10.weight");
    assert_eq!(conv.bias_key(), "features.10.bias");
}

#[test]
fn 채널_연결_일관성_테스트() {
    let mut expected_in = 3;
    for layer in vgg19_layers() {
        if let LayerKind::Conv { in_channels, out_channels } = layer.kind {
            assert_eq!(in_channels, expected_in, "{} 입력 채널", layer.name);
            expected_in = out_channels;
        }
    }
    assert_eq!(expected_in, 512);
}

#[test]
fn 레이어_위치_조회_테스트() {
    assert_eq!(layer_position("block1_conv1"), Some(0));
    assert_eq!(layer_position("block1_conv2"), Some(1));
    assert_eq!(layer_position("block6_conv1"), None);
    assert_eq!(layer_position("fc1"), None);
}
