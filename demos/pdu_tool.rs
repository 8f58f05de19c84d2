// ABOUTME: Command-line tool encoding a text message to a PDU or decoding a hex PDU
// ABOUTME: Shows PduCodec usage for the GSM, Cell Broadcast and CDMA formats

use argh::FromArgs;
use smspdu::{CodecConfig, EncodeRequest, PduCodec, Protocol, SmsMessage};
use std::error::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Encode or decode an SMS PDU
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// wire format: gsm, cb or cdma (default: gsm)
    #[argh(option, short = 'p')]
    protocol: Option<String>,

    /// GSM PDUs carry a service-centre address block
    #[argh(switch)]
    smsc: bool,

    /// hex encoded PDU to decode
    #[argh(option)]
    decode: Option<String>,

    /// the message to encode
    #[argh(option, short = 'm')]
    message: Option<String>,

    /// the recipient telephone number (encodes an SMS-SUBMIT)
    #[argh(option, short = 't')]
    to: Option<String>,

    /// the sender telephone number (encodes an SMS-DELIVER)
    #[argh(option, short = 'f')]
    from: Option<String>,

    /// request a status report
    #[argh(switch)]
    status_report: bool,
}

fn parse_protocol(name: &str) -> Result<Protocol, Box<dyn Error>> {
    match name.to_ascii_lowercase().as_str() {
        "gsm" => Ok(Protocol::Gsm),
        "cb" | "cell-broadcast" => Ok(Protocol::CellBroadcast),
        "cdma" => Ok(Protocol::Cdma),
        other => Err(format!("unknown protocol {other}").into()),
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err("hex PDU has an odd number of digits".into());
    }
    digits
        .chunks_exact(2)
        .map(|pair| -> Result<u8, Box<dyn Error>> {
            let pair = std::str::from_utf8(pair)?;
            Ok(u8::from_str_radix(pair, 16)?)
        })
        .collect()
}

fn print_message(message: &SmsMessage) {
    println!("{}", message.kind_name());
    if let Some(address) = message.address() {
        println!("  address:   {address}");
    }
    if let Some(timestamp) = message.timestamp() {
        println!("  timestamp: {timestamp}");
    }
    if let SmsMessage::StatusReport(report) = message {
        println!("  status:    0x{:02X}", report.status);
    }
    match (message.format(), message.text()) {
        (_, Some(text)) => println!("  text:      {text}"),
        (Some(format), None) => println!("  data:      {:?} {:02X?}", format, message.data()),
        _ => {}
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let protocol = parse_protocol(cli_args.protocol.as_deref().unwrap_or("gsm"))?;
    let codec = PduCodec::new(CodecConfig::default().with_smsc_info(cli_args.smsc));

    if let Some(hex) = cli_args.decode {
        let decoded = codec.decode(protocol, &parse_hex(&hex)?)?;
        print_message(&decoded.message);
        return Ok(());
    }

    let message = cli_args.message.ok_or("--message or --decode is required")?;
    let mut builder = EncodeRequest::builder().text(&message).protocol(protocol);
    builder = match (cli_args.to, cli_args.from) {
        (Some(to), _) => builder.to(to),
        (None, Some(from)) => builder.from(from),
        (None, None) => return Err("--to or --from is required".into()),
    };
    if cli_args.status_report {
        builder = builder.with_status_report();
    }

    let pdu = codec.encode(&builder.build()?)?;
    let hex: String = pdu.data.iter().map(|b| format!("{b:02X}")).collect();
    println!("{} PDU ({} bytes): {}", pdu.protocol, pdu.len(), hex);

    Ok(())
}
