use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use viewmorph_image::Image;
use viewmorph_imgproc::{
    interpolation::InterpolationMode,
    warp::{warp_affine, warp_perspective},
};

fn bench_warp_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpAffine");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let m = [0.7, -0.7, *width as f32 / 2.0, 0.7, 0.7, 0.0];

        group.bench_with_input(
            BenchmarkId::new("bilinear", &parameter_string),
            &(&image, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                b.iter(|| {
                    warp_affine(
                        black_box(&src),
                        black_box(&mut dst),
                        black_box(&m),
                        black_box(InterpolationMode::Bilinear),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let m = [1.0, 0.1, 0.0, 0.1, 1.0, 0.0, 1e-4, 1e-4, 1.0];

        group.bench_with_input(
            BenchmarkId::new("bilinear", &parameter_string),
            &(&image, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                b.iter(|| {
                    warp_perspective(
                        black_box(&src),
                        black_box(&mut dst),
                        black_box(&m),
                        black_box(InterpolationMode::Bilinear),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_warp_affine, bench_warp_perspective);
criterion_main!(benches);
