//! 고정된(frozen) VGG19 특징 추출기
//!
//! 가중치는 Var가 아닌 일반 텐서로 보관되므로 역전파가 네트워크 안으로
//! 흘러가도 가중치 그래디언트는 만들어지지 않는다.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, Module, VarBuilder};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::layers::{vgg19_layers, LayerKind, LayerSpec};
use super::preprocess::Preprocessing;
use super::weights::check_weights;
use crate::core::error::{Result, StyleError};

// 프로세스 전역 네트워크 (첫 사용 시 한 번만 로드)
static SHARED_VGG19: OnceCell<Arc<Vgg19>> = OnceCell::new();

/// 이미지 -> 이름 붙은 레이어 활성값
pub trait FeatureExtractor: Send + Sync {
    /// 해당 이름의 레이어가 네트워크에 있는지
    fn has_layer(&self, name: &str) -> bool;

    /// (1,H,W,3) [0,1] 이미지에 대해 `layer_names` 순서대로 (1,H',W',C) 활성값을 돌려준다
    fn extract(&self, image: &Tensor, layer_names: &[String]) -> Result<Vec<Tensor>>;
}

enum StageOp {
    Conv(Conv2d),
    Pool,
}

struct Stage {
    spec: LayerSpec,
    op: StageOp,
}

pub struct Vgg19 {
    stages: Vec<Stage>,
    preprocessing: Preprocessing,
}

impl std::fmt::Debug for Vgg19 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vgg19")
            .field("layers", &self.layer_names())
            .field("preprocessing", &self.preprocessing)
            .finish()
    }
}

/// `last_layer`까지 포함하는 스테이지 수. None이면 전체.
pub fn depth_through(last_layer: Option<&str>) -> Result<usize> {
    let layers = vgg19_layers();
    match last_layer {
        None => Ok(layers.len()),
        Some(name) => layers
            .iter()
            .position(|l| l.name == name)
            .map(|p| p + 1)
            .ok_or_else(|| StyleError::InvalidLayerName(name.to_string())),
    }
}

impl Vgg19 {
    /// VarBuilder(`features.{index}` 구조)에서 앞쪽 `depth`개 스테이지만 구성
    pub fn from_var_builder(vb: VarBuilder, preprocessing: Preprocessing, depth: usize) -> Result<Self> {
        let features = vb.pp("features");
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };

        let mut stages = Vec::with_capacity(depth);
        for spec in vgg19_layers().into_iter().take(depth) {
            let op = match spec.kind {
                LayerKind::Conv { in_channels, out_channels } => StageOp::Conv(conv2d(
                    in_channels,
                    out_channels,
                    3,
                    cfg,
                    features.pp(spec.feature_index),
                )?),
                LayerKind::Pool => StageOp::Pool,
            };
            stages.push(Stage { spec, op });
        }

        Ok(Self { stages, preprocessing })
    }

    /// safetensors 파일에서 로드. `last_layer` 이후 레이어는 만들지 않는다.
    pub fn load(
        path: &Path,
        preprocessing: Preprocessing,
        last_layer: Option<&str>,
        device: &Device,
    ) -> Result<Self> {
        let depth = depth_through(last_layer)?;
        let specs: Vec<LayerSpec> = vgg19_layers().into_iter().take(depth).collect();
        check_weights(path, &specs)?;

        log::info!("VGG19 가중치 로드: {} ({}개 스테이지)", path.display(), depth);
        let tensors = candle_core::safetensors::load(path, device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Self::from_var_builder(vb, preprocessing, depth)
    }

    /// 시드 고정 He-uniform 초기화 네트워크 (사전학습 가중치 없이 파이프라인 검증용)
    pub fn with_random_weights(
        seed: u64,
        preprocessing: Preprocessing,
        last_layer: Option<&str>,
        device: &Device,
    ) -> Result<Self> {
        let depth = depth_through(last_layer)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tensors = HashMap::new();

        for spec in vgg19_layers().into_iter().take(depth) {
            if let LayerKind::Conv { in_channels, out_channels } = spec.kind {
                let fan_in = in_channels * 9;
                let bound = (6.0 / fan_in as f32).sqrt();
                let weight: Vec<f32> = (0..out_channels * fan_in)
                    .map(|_| rng.gen_range(-bound..bound))
                    .collect();
                tensors.insert(
                    spec.weight_key(),
                    Tensor::from_vec(weight, (out_channels, in_channels, 3, 3), device)?,
                );
                tensors.insert(spec.bias_key(), Tensor::zeros(out_channels, DType::F32, device)?);
            }
        }

        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Self::from_var_builder(vb, preprocessing, depth)
    }

    /// 프로세스 전역 네트워크. `last_layer`까지만 로드한다.
    ///
    /// 첫 호출의 인자로 한 번만 로드되며, 이후 호출은 인자와 무관하게 같은 인스턴스를 돌려준다.
    pub fn shared(
        path: &Path,
        preprocessing: Preprocessing,
        last_layer: Option<&str>,
        device: &Device,
    ) -> Result<Arc<Self>> {
        if let Some(existing) = SHARED_VGG19.get() {
            log::debug!("공유 VGG19 재사용 ({}개 스테이지)", existing.depth());
            return Ok(Arc::clone(existing));
        }
        SHARED_VGG19
            .get_or_try_init(|| Self::load(path, preprocessing, last_layer, device).map(Arc::new))
            .map(Arc::clone)
    }

    /// 구성된 레이어 이름 (깊이 순)
    pub fn layer_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.spec.name.as_str()).collect()
    }

    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    pub fn preprocessing(&self) -> Preprocessing {
        self.preprocessing
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.spec.name == name)
    }
}

impl FeatureExtractor for Vgg19 {
    fn has_layer(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn extract(&self, image: &Tensor, layer_names: &[String]) -> Result<Vec<Tensor>> {
        let positions = layer_names
            .iter()
            .map(|name| {
                self.position(name)
                    .ok_or_else(|| StyleError::InvalidLayerName(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let dims = image.dims();
        if dims.len() != 4 || dims[0] != 1 || dims[3] != 3 {
            return Err(StyleError::invalid_input(
                "image tensor",
                format!("(1,H,W,3) 형상이어야 함: {:?}", dims),
            ));
        }

        let deepest = match positions.iter().max() {
            Some(&p) => p,
            None => return Ok(Vec::new()),
        };

        // NHWC -> NCHW
        let mut x = self
            .preprocessing
            .apply(image)?
            .permute((0, 3, 1, 2))?
            .contiguous()?;

        let mut outputs: Vec<Option<Tensor>> = vec![None; positions.len()];
        for (index, stage) in self.stages.iter().enumerate().take(deepest + 1) {
            x = match &stage.op {
                StageOp::Conv(conv) => conv.forward(&x)?.relu()?,
                StageOp::Pool => x.max_pool2d(2)?,
            };

            for (slot, &position) in outputs.iter_mut().zip(positions.iter()) {
                if position == index {
                    // NCHW -> NHWC
                    *slot = Some(x.permute((0, 2, 3, 1))?.contiguous()?);
                }
            }
        }

        outputs
            .into_iter()
            .zip(layer_names)
            .map(|(out, name)| out.ok_or_else(|| StyleError::InvalidLayerName(name.clone())))
            .collect()
    }
}
