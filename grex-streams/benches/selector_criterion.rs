use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use grex_streams::{BlockNode, PortReceiver, PortSender, RouteControl, StreamSelector, Tag};
use integration_test_utils::{bytes_buffer, connect_ports};
use serde_json::json;

const FAN: usize = 4;
const BUFFER_ITEMS: usize = 1024;
const BUFFERS_PER_INPUT: usize = 8;
const TAGS_PER_INPUT: usize = 32;

struct SelectorFixture {
    node: BlockNode,
    control: RouteControl,
    inputs: Vec<PortSender>,
    outputs: Vec<PortReceiver>,
}

impl SelectorFixture {
    fn new(routes: &[i32]) -> Self {
        let connected = connect_ports(FAN, FAN);
        let selector = StreamSelector::new(1);
        let control = selector.control();
        let node = BlockNode::new(Box::new(selector), connected.ports);
        control.configure(routes);
        Self {
            node,
            control,
            inputs: connected.inputs,
            outputs: connected.outputs,
        }
    }

    fn prime_buffers(&self) {
        let chunk = vec![0xa5u8; BUFFER_ITEMS];
        for input in &self.inputs {
            for _ in 0..BUFFERS_PER_INPUT {
                input.send_buffer(bytes_buffer(&chunk));
            }
        }
    }

    fn prime_tags(&self) {
        for input in &self.inputs {
            for offset in 0..TAGS_PER_INPUT {
                input.send_tag(Tag::new(offset as u64, "bench", json!(offset)));
            }
        }
    }

    fn run_until_idle(&mut self) -> usize {
        let mut steps = 0;
        while self.node.step() {
            steps += 1;
        }
        for output in &self.outputs {
            black_box(output.drain());
        }
        steps
    }
}

fn selector_criterion(c: &mut Criterion) {
    let mut step_group = c.benchmark_group("selector_step");
    step_group.bench_function("forward_crossed", |b| {
        b.iter_batched(
            || {
                let fixture = SelectorFixture::new(&[3, 2, 1, 0]);
                fixture.prime_buffers();
                fixture
            },
            |mut fixture| black_box(fixture.run_until_idle()),
            BatchSize::SmallInput,
        );
    });
    step_group.bench_function("sink_all", |b| {
        b.iter_batched(
            || {
                let fixture = SelectorFixture::new(&[-2; FAN]);
                fixture.prime_buffers();
                fixture
            },
            |mut fixture| black_box(fixture.run_until_idle()),
            BatchSize::SmallInput,
        );
    });
    step_group.bench_function("tag_translation", |b| {
        b.iter_batched(
            || {
                let fixture = SelectorFixture::new(&[0, 0, 1, 1]);
                fixture.prime_tags();
                fixture
            },
            |mut fixture| black_box(fixture.run_until_idle()),
            BatchSize::SmallInput,
        );
    });
    step_group.finish();

    let mut control_group = c.benchmark_group("route_control");
    let fixture = SelectorFixture::new(&[-1; FAN]);
    control_group.bench_function("configure", |b| {
        b.iter(|| fixture.control.configure(black_box(&[0, 1, -2, -1])));
    });
    control_group.finish();
}

criterion_group!(benches, selector_criterion);
criterion_main!(benches);
