//! Manage command line arguments here.
use clap::{App, Arg};
use std::str::FromStr;

use recursor::error::DNSResult;
use recursor::rfc::qtype::QType;

/// This structure holds the command line arguments.
#[derive(Debug)]
pub struct CliOptions {
    pub qtype: QType,
    pub domain: String,
    pub dnssec: bool,
    pub no_min: bool,
    pub prefer_ipv6: bool,
    pub timeout: u32,
    pub retries: u16,
    pub payload: u16,
    pub minimal: bool,
    pub verbose: bool,
}

impl CliOptions {
    pub fn options() -> DNSResult<Self> {
        let matches = App::new("recq")
            .version("0.1")
            .about(
                r#"An iterative DNS resolution tool

            Walks the delegation tree from the root servers itself instead of
            asking a recursive resolver.
            "#,
            )
            .arg(
                Arg::new("domain")
                    .short('d')
                    .long("domain")
                    .required(true)
                    .long_help("Domain to resolve")
                    .takes_value(true),
            )
            .arg(
                Arg::new("qtype")
                    .short('q')
                    .long("qtype")
                    .long_help("QType value (A, AAAA, MX, ... or TYPEnnn)")
                    .default_value("A")
                    .takes_value(true),
            )
            .arg(
                Arg::new("dnssec")
                    .short('s')
                    .long("dnssec")
                    .long_help("Validate DNSSEC and require a secure chain")
                    .takes_value(false),
            )
            .arg(
                Arg::new("no-min")
                    .long("no-min")
                    .long_help("Disable QNAME minimization")
                    .takes_value(false),
            )
            .arg(
                Arg::new("prefer-ipv6")
                    .short('6')
                    .long("prefer-ipv6")
                    .long_help("Try IPv6 nameserver addresses first")
                    .takes_value(false),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .long_help("Per-attempt timeout in milliseconds")
                    .default_value("3000")
                    .takes_value(true),
            )
            .arg(
                Arg::new("retries")
                    .long("retries")
                    .long_help("Transport retries per attempt")
                    .default_value("2")
                    .takes_value(true),
            )
            .arg(
                Arg::new("payload")
                    .long("payload")
                    .long_help("EDNS UDP payload size")
                    .default_value("1232")
                    .takes_value(true),
            )
            .arg(
                Arg::new("minimal")
                    .short('m')
                    .long("minimal")
                    .long_help("Trim authority and additional sections from the output")
                    .takes_value(false),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .long_help("Debug logging")
                    .takes_value(false),
            )
            .get_matches();

        Ok(CliOptions {
            domain: String::from(matches.value_of("domain").unwrap()),
            qtype: QType::from_str(matches.value_of("qtype").unwrap())?,
            dnssec: matches.is_present("dnssec"),
            no_min: matches.is_present("no-min"),
            prefer_ipv6: matches.is_present("prefer-ipv6"),
            timeout: matches.value_of("timeout").unwrap().parse().unwrap_or(3000),
            retries: matches.value_of("retries").unwrap().parse().unwrap_or(2),
            payload: matches.value_of("payload").unwrap().parse().unwrap_or(1232),
            minimal: matches.is_present("minimal"),
            verbose: matches.is_present("verbose"),
        })
    }
}
