use std::fs::File;
use std::io::{self, BufReader};

use trapper_frame::FrameConfig;
use trapper_sender::{Sample, SenderClient, SenderConfig};
use trapper_transport::{ConnectOptions, Target};

use crate::cmd::SendArgs;
use crate::exit::{io_error, sender_error, transport_error, CliError, CliResult, SUCCESS};
use crate::input::parse_samples;
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let target = Target::new(args.server.as_str(), args.port)
        .map_err(|err| transport_error("invalid collector", err))?;
    let samples = collect_samples(&args)?;

    let config = SenderConfig {
        frame: FrameConfig {
            max_payload_size: args.max_payload_size,
        },
        connect: args
            .timeout
            .map(ConnectOptions::with_timeout)
            .unwrap_or_default(),
    };
    let client = SenderClient::with_config(target, config);

    tracing::debug!(
        collector = %client.target(),
        samples = samples.len(),
        "submitting samples"
    );
    let response = client
        .send_batch(&samples, args.batch_clock, args.batch_ns)
        .map_err(|err| sender_error("send failed", err))?;

    print_response(
        &response,
        &client.target().to_string(),
        samples.len(),
        format,
    )?;
    Ok(SUCCESS)
}

fn collect_samples(args: &SendArgs) -> CliResult<Vec<Sample>> {
    if let Some(path) = &args.input_file {
        let samples = if path.as_os_str() == "-" {
            parse_samples(io::stdin().lock(), args.host.as_deref(), args.with_timestamps)?
        } else {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), &err))?;
            parse_samples(
                BufReader::new(file),
                args.host.as_deref(),
                args.with_timestamps,
            )?
        };
        if samples.is_empty() {
            return Err(CliError::usage("input contains no samples"));
        }
        return Ok(samples);
    }

    let (Some(host), Some(key), Some(value)) = (&args.host, &args.key, &args.value) else {
        return Err(CliError::usage(
            "either --input-file or --host, --key and --value are required",
        ));
    };

    let mut builder = Sample::builder(host.as_str(), key.as_str(), value.as_str());
    if let Some(clock) = args.clock {
        builder = builder.clock(clock);
    }
    if let Some(ns) = args.ns {
        builder = builder.ns(ns);
    }
    let sample = builder
        .build()
        .map_err(|err| sender_error("invalid sample", err))?;
    Ok(vec![sample])
}
