//! Go-Back-N 仿真
//!
//! A -> B 单向数据传输，信道可丢包/损坏；结束后输出统计摘要。

use clap::Parser;
use gbn_sim::net::run_scenario;
use gbn_sim::sim::ScenarioSpec;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "gbn_sim", about = "Go-Back-N 仿真：A->B 可靠传输（丢包/损坏信道）")]
struct Args {
    /// 场景 JSON 文件；命令行参数覆盖其中对应字段
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 发送窗口大小
    #[arg(long)]
    window_size: Option<u32>,

    /// 序号空间大小（至少为窗口的两倍）
    #[arg(long)]
    limit_seqnum: Option<u32>,

    /// 每个分组的载荷长度（字节）
    #[arg(long)]
    payload_size: Option<usize>,

    /// 要发送的消息数
    #[arg(long)]
    num_msgs: Option<u64>,

    #[arg(long)]
    loss_prob: Option<f64>,

    #[arg(long)]
    corrupt_prob: Option<f64>,

    /// 重传超时（微秒）
    #[arg(long)]
    timeout_us: Option<u64>,

    /// 消息平均到达间隔（微秒）
    #[arg(long)]
    msg_interval_us: Option<u64>,

    /// 单向最小时延（微秒）
    #[arg(long)]
    link_delay_us: Option<u64>,

    /// 时延抖动上限（微秒）
    #[arg(long)]
    link_jitter_us: Option<u64>,

    /// 是否允许同方向分组乱序到达（true/false）
    #[arg(long)]
    reorder: Option<bool>,

    #[arg(long)]
    seed: Option<u64>,

    /// 仿真运行到多少毫秒
    #[arg(long)]
    until_ms: Option<u64>,

    /// 输出统计报告 JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// 输出协议事件 JSON；不填则不记录
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

impl Args {
    fn apply(&self, spec: &mut ScenarioSpec) {
        macro_rules! override_field {
            ($($f:ident),*) => {
                $(if let Some(v) = self.$f { spec.$f = v; })*
            };
        }
        override_field!(
            window_size,
            limit_seqnum,
            payload_size,
            num_msgs,
            loss_prob,
            corrupt_prob,
            timeout_us,
            msg_interval_us,
            link_delay_us,
            link_jitter_us,
            reorder,
            seed,
            until_ms
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut spec = match &args.scenario {
        Some(path) => match ScenarioSpec::from_json_file(path) {
            Ok(spec) => spec,
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                process::exit(2);
            }
        },
        None => ScenarioSpec::default(),
    };
    args.apply(&mut spec);

    let mut world = match run_scenario(&spec, args.trace_json.is_some()) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    if let Some(path) = &args.trace_json {
        if let Some(t) = world.trace.take() {
            let json = t.to_json().expect("serialize trace events");
            fs::write(path, json).expect("write trace json");
            eprintln!("wrote trace events to {}", path.display());
        }
    }

    let report = world.report();
    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report).expect("serialize report");
        fs::write(path, json).expect("write report json");
        eprintln!("wrote report to {}", path.display());
    }

    println!("{}", report.summary_line());
}
