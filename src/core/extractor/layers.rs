//! VGG19 합성곱 트렁크의 레이어 표

/// 블록별 합성곱 개수
pub const VGG19_BLOCKS: [usize; 5] = [2, 2, 4, 4, 4];

/// 블록별 출력 채널 수
pub const VGG19_CHANNELS: [usize; 5] = [64, 128, 256, 512, 512];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// 3x3 합성곱 + ReLU
    Conv { in_channels: usize, out_channels: usize },
    /// 2x2 최대 풀링 (stride 2)
    Pool,
}

/// 레이어 하나의 정의
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    /// 가중치 파일의 `features.{index}` 위치 (torchvision Sequential 기준)
    pub feature_index: usize,
}

impl LayerSpec {
    pub fn weight_key(&self) -> String {
        format!("features.{}.weight", self.feature_index)
    }

    pub fn bias_key(&self) -> String {
        format!("features.{}.bias", self.feature_index)
    }

    pub fn is_conv(&self) -> bool {
        matches!(self.kind, LayerKind::Conv { .. })
    }
}

/// 네트워크 깊이 순서의 전체 레이어 목록
pub fn vgg19_layers() -> Vec<LayerSpec> {
    let mut layers = Vec::with_capacity(21);
    let mut index = 0;
    let mut in_channels = 3;

    for (block, (&convs, &channels)) in VGG19_BLOCKS.iter().zip(VGG19_CHANNELS.iter()).enumerate() {
        for conv in 0..convs {
            layers.push(LayerSpec {
                name: format!("block{}_conv{}", block + 1, conv + 1),
                kind: LayerKind::Conv { in_channels, out_channels: channels },
                feature_index: index,
            });
            in_channels = channels;
            // Sequential 안에서 conv 다음 ReLU가 한 칸을 차지함
            index += 2;
        }
        layers.push(LayerSpec {
            name: format!("block{}_pool", block + 1),
            kind: LayerKind::Pool,
            feature_index: index,
        });
        index += 1;
    }

    layers
}

/// 이름으로 깊이 위치 조회
pub fn layer_position(name: &str) -> Option<usize> {
    vgg19_layers().iter().position(|l| l.name == name)
}
