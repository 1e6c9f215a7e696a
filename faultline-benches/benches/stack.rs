use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use faultline::stack::StackCapture;
use faultline::stack::StackParser;
use faultline::stack::StackSource;
use faultline::stack::TextParser;
use faultline::stack::ThreadDump;
use std::hint::black_box;

const FRAMES: &[usize] = &[8, 32, 128, 512];

fn dump(frames: usize) -> String {
  let mut dump: String = String::from("goroutine 1 [running]:\n");

  for index in 0..frames {
    dump.push_str(&format!(
      "github.com/acme/app/layer{index}.(*Service).Call(0xc000010000)\n\t/home/acme/app/layer{index}/service.go:{index} +0x1d\n",
    ));
  }

  dump
}

fn bench_parse(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("parse");
  let parser: TextParser = TextParser::new();

  for frames in FRAMES {
    let id: BenchmarkId = BenchmarkId::new("text", frames);
    let text: String = dump(*frames);

    group.bench_with_input(id, &text, |bench, text| {
      bench.iter(|| black_box(parser.parse(black_box(text))));
    });
  }

  group.finish();
}

fn bench_capture(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("capture");
  let capture: StackCapture = StackCapture::default();
  let source: ThreadDump = ThreadDump::new();

  group.bench_function("raw-dump", |bench| {
    bench.iter(|| black_box(source.raw_dump()));
  });

  group.bench_function("structured", |bench| {
    bench.iter(|| black_box(capture.capture(0)));
  });

  group.finish();
}

criterion_group!(benches, bench_parse, bench_capture);
criterion_main!(benches);
