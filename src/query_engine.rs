use crate::host_list::{HostRecord, SnmpVersion};
use anyhow::{anyhow, bail, Context, Result};
use snmp2::{AsyncSession, Oid, Value};
use std::{future::Future, time::Duration};
use tokio::time::timeout;
use tracing::debug;

/// Tag attached to every request, mirroring the poller that asks for it.
pub const REQUEST_PURPOSE: &str = "poller";

/// A single-target SNMP conversation.
#[allow(async_fn_in_trait)]
pub trait SnmpSession {
    /// Fetch one scalar and render it as text.
    async fn get(&mut self, oid: &str) -> Result<String>;
}

/// Opens sessions for host records.
#[allow(async_fn_in_trait)]
pub trait SnmpConnector {
    type Session: SnmpSession;

    async fn connect(&self, host: &HostRecord) -> Result<Self::Session>;
}

/// Connector backed by the `snmp2` async session.
#[derive(Debug, Default, Clone, Copy)]
pub struct Snmp2Connector;

pub struct Snmp2Session {
    // AsyncSession carries its receive buffer inline, keep it off the stack
    session: Box<AsyncSession>,
    host: HostRecord,
    target: String,
    timeout: Duration,
    retries: u32,
}

impl SnmpConnector for Snmp2Connector {
    type Session = Snmp2Session;

    async fn connect(&self, host: &HostRecord) -> Result<Snmp2Session> {
        let target = host.target();
        debug!(
            "Opening {:?} session to {target} for {REQUEST_PURPOSE}",
            host.version()
        );
        if !host.snmp_context.is_empty() || !host.snmp_engine_id.is_empty() {
            debug!("{target}: context and engine id are negotiated by the session");
        }

        Ok(Snmp2Session {
            session: open_session(host).await?,
            host: host.clone(),
            target,
            timeout: host.timeout(),
            retries: host.retries(),
        })
    }
}

async fn open_session(host: &HostRecord) -> Result<Box<AsyncSession>> {
    let target = host.target();
    let community = host.snmp_community.as_bytes();
    match host.version() {
        SnmpVersion::V1 => {
            let opening = Box::pin(AsyncSession::new_v1(target.as_str(), community, 0));
            opened(host.timeout(), &target, opening).await
        }
        SnmpVersion::V2c => {
            let opening = Box::pin(AsyncSession::new_v2c(target.as_str(), community, 0));
            opened(host.timeout(), &target, opening).await
        }
        SnmpVersion::V3 => Box::pin(open_v3(host, &target)).await,
    }
}

async fn opened<F, E>(limit: Duration, target: &str, opening: F) -> Result<Box<AsyncSession>>
where
    F: Future<Output = Result<AsyncSession, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let session = timeout(limit, opening)
        .await
        .map_err(|_| anyhow!("Timed out opening session to {target}"))?
        .with_context(|| format!("Unable to open session to {target}"))?;
    Ok(Box::new(session))
}

#[cfg(feature = "snmpv3")]
async fn open_v3(host: &HostRecord, target: &str) -> Result<Box<AsyncSession>> {
    use snmp2::v3::{Auth, AuthProtocol, Cipher, Security};

    let auth_protocol = match host.snmp_auth_protocol.to_ascii_uppercase().as_str() {
        "MD5" => AuthProtocol::Md5,
        "SHA" | "SHA1" => AuthProtocol::Sha1,
        "SHA224" => AuthProtocol::Sha224,
        "SHA256" => AuthProtocol::Sha256,
        "SHA384" => AuthProtocol::Sha384,
        "SHA512" => AuthProtocol::Sha512,
        "" | "[NONE]" => AuthProtocol::Sha1,
        other => bail!("Unknown auth protocol {other}"),
    };
    let cipher = match host.snmp_priv_protocol.to_ascii_uppercase().as_str() {
        "DES" => Some(Cipher::Des),
        "AES" | "AES128" => Some(Cipher::Aes128),
        "AES192" => Some(Cipher::Aes192),
        "AES256" => Some(Cipher::Aes256),
        "" | "[NONE]" => None,
        other => bail!("Unknown privacy protocol {other}"),
    };
    let auth = match (host.snmp_password.is_empty(), cipher) {
        (true, _) => Auth::NoAuthNoPriv,
        (false, None) => Auth::AuthNoPriv,
        (false, Some(cipher)) => Auth::AuthPriv {
            cipher,
            privacy_password: host.snmp_priv_passphrase.as_bytes().to_vec(),
        },
    };

    let security = Security::new(host.snmp_username.as_bytes(), host.snmp_password.as_bytes())
        .with_auth_protocol(auth_protocol)
        .with_auth(auth);

    let opening = Box::pin(AsyncSession::new_v3(target, 0, security));
    let mut session = opened(host.timeout(), target, opening).await?;
    timeout(host.timeout(), Box::pin(session.init()))
        .await
        .map_err(|_| anyhow!("Timed out discovering engine of {target}"))?
        .with_context(|| format!("Engine discovery failed for {target}"))?;
    Ok(session)
}

#[cfg(not(feature = "snmpv3"))]
async fn open_v3(_host: &HostRecord, target: &str) -> Result<Box<AsyncSession>> {
    bail!("{target} requires SNMPv3, built without the snmpv3 feature")
}

impl SnmpSession for Snmp2Session {
    async fn get(&mut self, oid: &str) -> Result<String> {
        let parsed = parse_oid(oid)?;
        let mut attempt = 0;
        loop {
            let failure = match timeout(self.timeout, Box::pin(self.session.get(&parsed))).await {
                Ok(Ok(mut response)) => {
                    let (_, value) = response
                        .varbinds
                        .next()
                        .ok_or_else(|| anyhow!("Empty response from {}", self.target))?;
                    return as_string(&value);
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => "timeout".to_string(),
            };

            attempt += 1;
            if attempt > self.retries {
                bail!("{}: {failure} on {oid} after {attempt} attempts", self.target);
            }
            debug!("{}: {failure} on {oid}, retry {attempt}", self.target);
            // A fresh socket never sees late replies to the abandoned request.
            self.session = open_session(&self.host).await?;
        }
    }
}

pub fn parse_oid(oid: &str) -> Result<Oid<'static>> {
    let parts = oid
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect::<Result<Vec<u64>, _>>()
        .with_context(|| format!("Invalid OID {oid}"))?;
    Oid::from(&parts).map_err(|e| anyhow!("Invalid OID {oid}: {e:?}"))
}

pub fn as_string(value: &Value) -> Result<String> {
    match value {
        Value::Integer(i) => Ok(i.to_string()),
        Value::Counter32(i) | Value::Unsigned32(i) | Value::Timeticks(i) => Ok(i.to_string()),
        Value::Counter64(i) => Ok(i.to_string()),
        Value::OctetString(s) => Ok(String::from_utf8_lossy(s).into_owned()),
        other => bail!("Unsupported value {other:?}"),
    }
}
