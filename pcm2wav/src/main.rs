use clap::Parser;
use pcmwav::{
    EncodeOptions, OddLength, decode_base64, encode_base64, pcm_to_wav, wav_data_url, write_wav,
};
use pcmwav_http::ServerConfig;
use std::net::SocketAddr;
use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pcm2wav")]
#[command(version = "0.1")]
#[command(about = "Wrap mono 16-bit PCM in a WAV container")]
struct Cli {
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Base64 PCM input, stdin if omitted"
    )]
    input: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file, stdout if omitted"
    )]
    output: Option<PathBuf>,

    #[arg(
        short = 'r',
        long = "rate",
        value_name = "HZ",
        default_value_t = pcmwav::DEFAULT_SAMPLE_RATE,
        help = "Sample rate written to the header, also the server default"
    )]
    rate: u32,

    #[arg(long = "raw", help = "Input is raw PCM bytes rather than base64 text")]
    raw: bool,

    #[arg(
        long = "wav",
        conflicts_with = "data_url",
        help = "Write a binary WAV file instead of base64"
    )]
    wav: bool,

    #[arg(long = "data-url", help = "Write a data:audio/wav URL")]
    data_url: bool,

    #[arg(long = "strict", help = "Reject odd-length PCM instead of dropping the last byte")]
    strict: bool,

    #[arg(long = "serve", help = "Run the HTTP conversion server")]
    serve: bool,

    #[arg(
        long = "addr",
        value_name = "ADDR",
        default_value = "0.0.0.0:3000",
        help = "Address the HTTP server listens on"
    )]
    addr: SocketAddr,
}

impl Cli {
    fn odd_length(&self) -> OddLength {
        if self.strict {
            OddLength::Reject
        } else {
            OddLength::Truncate
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn open_output(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(io::BufWriter::new(fs::File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn convert(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let opts = EncodeOptions {
        sample_rate: args.rate,
        odd_length: args.odd_length(),
    };

    let input = read_input(args.input.as_ref())?;
    let pcm = if args.raw {
        input
    } else {
        decode_base64(std::str::from_utf8(&input)?)?
    };

    let mut out = open_output(args.output.as_ref())?;
    if args.wav {
        let written = write_wav(&mut out, &pcm, &opts)?;
        tracing::info!(bytes = written, "wrote WAV");
    } else {
        let wav = pcm_to_wav(&pcm, &opts)?;
        let text = if args.data_url {
            wav_data_url(&wav)
        } else {
            encode_base64(&wav)
        };
        writeln!(out, "{}", text)?;
        tracing::info!(bytes = wav.len(), "wrote base64 WAV");
    }
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Audio saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();

    if !args.serve {
        return convert(&args);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let app = pcmwav_http::create_server(ServerConfig {
            sample_rate: args.rate,
            odd_length: args.odd_length(),
            ..ServerConfig::default()
        });
        tracing::info!("Starting PCM to WAV server on http://{}", args.addr);
        pcmwav_http::serve(
            tokio::net::TcpListener::bind(&args.addr).await?,
            app.into_make_service(),
        )
        .await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
