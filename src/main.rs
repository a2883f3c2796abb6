use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use candle_core::Device;
use clap::{Arg, ArgAction, ArgMatches, Command};
use indicatif::{ProgressBar, ProgressStyle};

use neural_style::core::{
    log_summary, vgg19_layers, ImageLocator, LossComposer, StyleContentModel, TargetBundle, TransferConfig,
    TransferEvent, WeightsDownloader,
};
use neural_style::{load_image, save_snapshot, FeatureExtractor, Preprocessing, StyleTransfer, Vgg19};

fn cli() -> Command {
    Command::new("neural_style")
        .version("0.1.0")
        .about("사전학습 VGG19 특징을 이용한 신경망 스타일 전이")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("콘텐츠 이미지에 스타일 이미지의 질감을 입힌다")
                .arg(Arg::new("content").required(true).help("콘텐츠 이미지 경로 또는 URL"))
                .arg(Arg::new("style").required(true).help("스타일 이미지 경로 또는 URL"))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_name("FILE")
                        .help("JSON 설정 파일"),
                )
                .arg(Arg::new("epochs").long("epochs").value_name("N").help("스냅샷 횟수"))
                .arg(
                    Arg::new("steps-per-epoch")
                        .long("steps-per-epoch")
                        .value_name("N")
                        .help("스냅샷 사이 스텝 수"),
                )
                .arg(Arg::new("max-dim").long("max-dim").value_name("PX").help("입력 긴 변 길이"))
                .arg(Arg::new("style-weight").long("style-weight").value_name("W"))
                .arg(Arg::new("content-weight").long("content-weight").value_name("W"))
                .arg(Arg::new("tv-weight").long("tv-weight").value_name("W"))
                .arg(Arg::new("learning-rate").long("learning-rate").value_name("LR"))
                .arg(
                    Arg::new("weights")
                        .long("weights")
                        .value_name("FILE")
                        .help("VGG19 safetensors 파일 (없으면 Hub에서 다운로드)"),
                )
                .arg(
                    Arg::new("preprocessing")
                        .long("preprocessing")
                        .value_name("MODE")
                        .help("가중치 전처리 규약: torch | caffe"),
                )
                .arg(
                    Arg::new("random-weights")
                        .long("random-weights")
                        .value_name("SEED")
                        .help("사전학습 가중치 대신 시드 고정 무작위 가중치 사용"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("DIR")
                        .help("스냅샷 출력 디렉토리"),
                )
                .arg(
                    Arg::new("dump-config")
                        .long("dump-config")
                        .action(ArgAction::SetTrue)
                        .help("최종 설정을 출력하고 종료"),
                ),
        )
        .subcommand(Command::new("layers").about("VGG19 레이어 이름 목록"))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("run", sub_matches)) => handle_run(sub_matches).await,
        Some(("layers", _)) => handle_layers(),
        _ => {
            println!("❌ 명령을 지정해주세요. --help를 참조하세요.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ 오류: {:#}", e);
        process::exit(1);
    }
}

fn parse_opt<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .get_one::<String>(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("--{} 값 '{}' 해석 실패: {}", name, raw, e))
        })
        .transpose()
}

/// 설정 파일 위에 CLI 플래그를 덮어쓴다
fn build_config(matches: &ArgMatches) -> Result<TransferConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => TransferConfig::from_json_file(Path::new(path))
            .with_context(|| format!("설정 파일 로드 실패: {}", path))?,
        None => TransferConfig::default(),
    };

    if let Some(v) = parse_opt(matches, "epochs")? {
        config.epochs = v;
    }
    if let Some(v) = parse_opt(matches, "steps-per-epoch")? {
        config.steps_per_epoch = v;
    }
    if let Some(v) = parse_opt(matches, "max-dim")? {
        config.max_input_dimension = v;
    }
    if let Some(v) = parse_opt(matches, "style-weight")? {
        config.style_weight = v;
    }
    if let Some(v) = parse_opt(matches, "content-weight")? {
        config.content_weight = v;
    }
    if let Some(v) = parse_opt(matches, "tv-weight")? {
        config.total_variation_weight = v;
    }
    if let Some(v) = parse_opt(matches, "learning-rate")? {
        config.optimizer.learning_rate = v;
    }
    if let Some(v) = parse_opt::<Preprocessing>(matches, "preprocessing")? {
        config.preprocessing = v;
    }
    if let Some(path) = matches.get_one::<String>("weights") {
        config.weights = Some(PathBuf::from(path));
    }
    if let Some(dir) = matches.get_one::<String>("output") {
        config.output_dir = PathBuf::from(dir);
    }

    config.validate()?;
    Ok(config)
}

async fn load_extractor(config: &TransferConfig, random_seed: Option<u64>, device: &Device) -> Result<Arc<Vgg19>> {
    if let Some(seed) = random_seed {
        println!("⚠️ 무작위 가중치 사용 (seed={})", seed);
        let vgg = Vgg19::with_random_weights(seed, config.preprocessing, config.deepest_layer(), device)?;
        return Ok(Arc::new(vgg));
    }

    let weights = match &config.weights {
        Some(path) => path.clone(),
        None => WeightsDownloader::new(&config.weights_repo).download().await?,
    };
    Ok(Vgg19::shared(&weights, config.preprocessing, config.deepest_layer(), device)?)
}

async fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;
    if matches.get_flag("dump-config") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    let random_seed = parse_opt::<u64>(matches, "random-weights")?;
    let device = Device::Cpu;

    let content_locator = ImageLocator::parse(matches.get_one::<String>("content").context("콘텐츠 이미지 누락")?);
    let style_locator = ImageLocator::parse(matches.get_one::<String>("style").context("스타일 이미지 누락")?);

    println!("🎨 스타일 전이 시작:");
    println!("   콘텐츠: {}", content_locator);
    println!("   스타일: {}", style_locator);
    println!("   예산: {}에폭 x {}스텝", config.epochs, config.steps_per_epoch);
    println!("   최대 입력 크기: {}", config.max_input_dimension);

    // 입력 검증은 최적화 전에 끝낸다
    let content_path = content_locator.resolve(&config.cache_dir, "content").await?;
    let style_path = style_locator.resolve(&config.cache_dir, "style").await?;
    let content_image = load_image(&content_path, config.max_input_dimension, &device)?;
    let style_image = load_image(&style_path, config.max_input_dimension, &device)?;

    let extractor = load_extractor(&config, random_seed, &device).await?;
    println!("✅ 특징 추출기 준비 완료: {}개 레이어", extractor.depth());

    let model = StyleContentModel::new(
        extractor.clone() as Arc<dyn FeatureExtractor>,
        config.style_layers.clone(),
        config.content_layers.clone(),
    )?;

    let targets = Arc::new(TargetBundle::compute(&model, &content_image, &style_image)?);
    log_summary("스타일 타깃", targets.style())?;
    log_summary("콘텐츠 타깃", targets.content())?;

    let mut transfer = StyleTransfer::new(
        model,
        targets,
        LossComposer::new(config.loss_weights()),
        &config.optimizer,
        config.budget(),
    );
    transfer.seed(&content_image)?;

    let progress_style = ProgressStyle::default_bar()
        .template("  [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("██░");
    let mut bar = ProgressBar::new(config.steps_per_epoch as u64).with_style(progress_style.clone());

    let start = Instant::now();
    let output_dir = config.output_dir.clone();
    let summary = transfer.run(|event| {
        match event {
            TransferEvent::Step { step, loss } => {
                bar.inc(1);
                bar.set_message(format!("스텝 {} loss={:.2}", step, loss));
            }
            TransferEvent::EpochEnd { epoch, image } => {
                bar.finish_and_clear();
                let path = save_snapshot(image, &output_dir, epoch)?;
                println!("📸 에폭 {} 스냅샷: {}", epoch, path.display());
                bar = ProgressBar::new(config.steps_per_epoch as u64).with_style(progress_style.clone());
            }
        }
        Ok(())
    })?;
    bar.finish_and_clear();

    println!("\n🏆 완료!");
    println!("   스텝: {}", summary.steps);
    if let (Some(first), Some(last)) = (summary.first_loss, summary.last_loss) {
        println!("   손실: {:.4} -> {:.4}", first, last);
    }
    println!("Total time: {:.1}", start.elapsed().as_secs_f64());

    Ok(())
}

fn handle_layers() -> Result<()> {
    println!("📋 VGG19 레이어:");
    for layer in vgg19_layers() {
        println!("  {}", layer.name);
    }
    Ok(())
}
