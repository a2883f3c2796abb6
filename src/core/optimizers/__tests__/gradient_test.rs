use approx::assert_abs_diff_eq;
use candle_core::{Device, Tensor, Var};

use crate::core::error::Result;
use crate::core::loss::total_variation_loss;
use crate::core::optimizers::*;
use crate::core::test_support::{synthetic_image, to_vec};

#[test]
fn 역전파_이차함수_그래디언트_테스트() {
    let var = Var::from_tensor(&Tensor::new(&[1f32, -2.0, 0.5], &Device::Cpu).unwrap()).unwrap();
    let loss_fn = |x: &Tensor| -> Result<Tensor> { Ok(x.sqr()?.sum_all()?) };

    let (value, grad) = Backprop.value_and_gradient(&loss_fn, &var).unwrap();

    assert_abs_diff_eq!(value, 5.25, epsilon = 1e-6);
    assert_eq!(to_vec(&grad), vec![2.0, -4.0, 1.0]);
}

#[test]
fn 역전파와_중앙차분_일치_테스트() {
    let image = synthetic_image(4, 5, 3);
    let var = Var::from_tensor(&image).unwrap();
    let loss_fn = |x: &Tensor| -> Result<Tensor> { Ok((total_variation_loss(x)? * 100.0)?) };

    let (v1, g1) = Backprop.value_and_gradient(&loss_fn, &var).unwrap();
    let (v2, g2) = FiniteDifference::default().value_and_gradient(&loss_fn, &var).unwrap();

    assert_abs_diff_eq!(v1, v2, epsilon = 1e-4);
    assert_eq!(g1.dims(), g2.dims());
    for (a, b) in to_vec(&g1).iter().zip(to_vec(&g2).iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-2);
    }

    println!("✅ 역전파와 중앙차분 일치 테스트 통과");
}

#[test]
fn 변수와_무관한_손실은_0_그래디언트_테스트() {
    let var = Var::from_tensor(&Tensor::new(&[1f32, 2.0], &Device::Cpu).unwrap()).unwrap();
    let constant = Tensor::new(3f32, &Device::Cpu).unwrap();
    let loss_fn = |_: &Tensor| -> Result<Tensor> { Ok(constant.clone()) };

    let (value, grad) = Backprop.value_and_gradient(&loss_fn, &var).unwrap();
    assert_eq!(value, 3.0);
    assert_eq!(to_vec(&grad), vec![0.0, 0.0]);
}

#[test]
fn 스칼라가_아닌_손실_거부_테스트() {
    let var = Var::from_tensor(&Tensor::new(&[1f32, 2.0], &Device::Cpu).unwrap()).unwrap();
    let loss_fn = |x: &Tensor| -> Result<Tensor> { Ok(x.clone()) };
    assert!(Backprop.value_and_gradient(&loss_fn, &var).is_err());
    assert!(FiniteDifference::default().value_and_gradient(&loss_fn, &var).is_err());
}
