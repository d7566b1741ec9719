//! recq: resolve a name by walking the delegation tree, the library way.
//!
//! Exit codes: 0 success, 2 server failure, 3 no such domain, 4 refused,
//! 5 timeout, 6 bogus DNSSEC, 7 malformed response.
use std::process::ExitCode;
use std::sync::Arc;

use log::{debug, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use recursor::error::{DNSError, ResolveError};
use recursor::name::normalize;
use recursor::resolver::{Resolver, ResolverOptions};
use recursor::rfc::question::Question;
use recursor::rfc::response_code::ResponseCode;

mod args;
use args::CliOptions;

mod display;
use display::display_response;

mod transport;
use transport::UdpDispatcher;

const EXIT_SERVFAIL: u8 = 2;
const EXIT_NXDOMAIN: u8 = 3;
const EXIT_REFUSED: u8 = 4;
const EXIT_TIMEOUT: u8 = 5;
const EXIT_BOGUS: u8 = 6;
const EXIT_MALFORMED: u8 = 7;

#[tokio::main]
async fn main() -> ExitCode {
    // manage arguments from command line
    let options = match CliOptions::options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_SERVFAIL);
        }
    };

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
    debug!("options: {:?}", &options);

    match run(&options).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(options: &CliOptions) -> Result<ExitCode, DNSError> {
    let name = normalize(&options.domain)?;
    let question = Question::with_name(name, options.qtype);

    let resolver_options = ResolverOptions {
        prefer_ipv6: options.prefer_ipv6,
        dnssec_validation: options.dnssec,
        qname_minimization: !options.no_min,
        timeout_ms: options.timeout,
        retries: options.retries,
        udp_payload_size: options.payload,
        minimal_response: options.minimal,
        ..Default::default()
    };

    let resolver = Resolver::new(Arc::new(UdpDispatcher));
    let response = resolver.resolve(&question, &resolver_options).await?;

    display_response(&response, options.minimal);

    let code = match response.rcode() {
        ResponseCode::NoError => 0,
        ResponseCode::NXDomain => EXIT_NXDOMAIN,
        ResponseCode::Refused => EXIT_REFUSED,
        _ => EXIT_SERVFAIL,
    };
    Ok(ExitCode::from(code))
}

fn exit_code_for(error: &DNSError) -> u8 {
    match error {
        DNSError::Dnssec(_) => EXIT_BOGUS,
        DNSError::Codec(_) => EXIT_MALFORMED,
        DNSError::Resolve(ResolveError::Timeout) => EXIT_TIMEOUT,
        DNSError::Resolve(ResolveError::Refused) => EXIT_REFUSED,
        DNSError::Resolve(ResolveError::NXDomain) => EXIT_NXDOMAIN,
        _ => EXIT_SERVFAIL,
    }
}
