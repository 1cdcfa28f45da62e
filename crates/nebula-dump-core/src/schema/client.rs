//! Blocking client for the cluster metadata service.
//!
//! Speaks Thrift binary protocol over a framed TCP transport. On connect the
//! client asks the service for its cluster info; a follower answers with
//! `E_LEADER_CHANGED` and the leader address, and the client reconnects
//! there once.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use thrift::protocol::{TBinaryInputProtocol, TBinaryOutputProtocol};
use thrift::transport::{TFramedReadTransport, TFramedWriteTransport};
use tracing::{debug, info};

use crate::error::{DumpError, DumpResult};
use crate::thrift::{
    meta_service_call, EdgeItem, HostAddr, IdName, IndexItem, MetaRequest, MetaResponse, Payload,
    SpaceItem, TagItem,
};

/// Default socket timeout for metadata RPCs.
pub const DEFAULT_META_TIMEOUT: Duration = Duration::from_secs(120);

/// `ErrorCode::E_LEADER_CHANGED`.
pub const E_LEADER_CHANGED: i32 = -4;

/// Connection settings for [`MetaClient`].
#[derive(Debug, Clone)]
pub struct MetaClientConfig {
    /// Connect, read and write timeout.
    pub timeout: Duration,
}

impl Default for MetaClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_META_TIMEOUT,
        }
    }
}

type InputProtocol = TBinaryInputProtocol<TFramedReadTransport<TcpStream>>;
type OutputProtocol = TBinaryOutputProtocol<TFramedWriteTransport<TcpStream>>;

struct Connection {
    address: String,
    input: InputProtocol,
    output: OutputProtocol,
}

impl Connection {
    fn open(address: &str, config: &MetaClientConfig) -> DumpResult<Self> {
        let addr = address
            .to_socket_addrs()
            .map_err(|e| DumpError::rpc(format!("cannot resolve meta address {}: {}", address, e)))?
            .next()
            .ok_or_else(|| DumpError::rpc(format!("meta address {} resolved to nothing", address)))?;

        let stream = TcpStream::connect_timeout(&addr, config.timeout)
            .map_err(|e| DumpError::rpc(format!("connect to {} failed: {}", address, e)))?;
        stream
            .set_read_timeout(Some(config.timeout))
            .and_then(|_| stream.set_write_timeout(Some(config.timeout)))
            .map_err(|e| DumpError::rpc(format!("set timeout on {} failed: {}", address, e)))?;
        let read_half = stream
            .try_clone()
            .map_err(|e| DumpError::rpc(format!("clone socket to {} failed: {}", address, e)))?;

        Ok(Self {
            address: address.to_string(),
            input: TBinaryInputProtocol::new(TFramedReadTransport::new(read_half), true),
            output: TBinaryOutputProtocol::new(TFramedWriteTransport::new(stream), true),
        })
    }
}

/// Client for the `MetaService` calls needed to build a schema cache.
pub struct MetaClient {
    conn: Connection,
    config: MetaClientConfig,
    seq: i32,
}

impl MetaClient {
    /// Connect to `address` (`host:port`), following a leader redirect once.
    ///
    /// # Errors
    ///
    /// * `DumpError::Rpc` - the address cannot be reached or the service
    ///   answers with an error
    pub fn connect(address: &str, config: MetaClientConfig) -> DumpResult<Self> {
        let conn = Connection::open(address, &config)?;
        let mut client = Self {
            conn,
            config,
            seq: 0,
        };

        let resp: MetaResponse<()> = client.raw_call("listCluster", MetaRequest::Empty)?;
        if resp.code == E_LEADER_CHANGED {
            client.follow_leader(&resp.leader)?;
        } else if resp.code != 0 {
            debug!(
                address = %address,
                code = resp.code,
                "listCluster rejected, continuing with this meta host"
            );
        }
        Ok(client)
    }

    /// Address of the meta host currently connected.
    pub fn address(&self) -> &str {
        &self.conn.address
    }

    /// All spaces as `(id, name)`.
    pub fn list_spaces(&mut self) -> DumpResult<Vec<IdName>> {
        self.call("listSpaces", MetaRequest::Empty)
    }

    /// The descriptor of the space called `name`.
    pub fn get_space(&mut self, name: &[u8]) -> DumpResult<Option<SpaceItem>> {
        self.call("getSpace", MetaRequest::SpaceName(name))
    }

    /// Every version of every tag in the space.
    pub fn list_tags(&mut self, space_id: i32) -> DumpResult<Vec<TagItem>> {
        self.call("listTags", MetaRequest::SpaceId(space_id))
    }

    /// Every version of every edge type in the space.
    pub fn list_edges(&mut self, space_id: i32) -> DumpResult<Vec<EdgeItem>> {
        self.call("listEdges", MetaRequest::SpaceId(space_id))
    }

    pub fn list_tag_indexes(&mut self, space_id: i32) -> DumpResult<Vec<IndexItem>> {
        self.call("listTagIndexes", MetaRequest::SpaceId(space_id))
    }

    pub fn list_edge_indexes(&mut self, space_id: i32) -> DumpResult<Vec<IndexItem>> {
        self.call("listEdgeIndexes", MetaRequest::SpaceId(space_id))
    }

    fn follow_leader(&mut self, leader: &HostAddr) -> DumpResult<()> {
        if leader.host.is_empty() {
            return Err(DumpError::rpc(format!(
                "{} reported a leader change without a leader address",
                self.conn.address
            )));
        }
        let address = leader.to_string();
        info!(from = %self.conn.address, to = %address, "meta leader changed, reconnecting");
        self.conn = Connection::open(&address, &self.config)?;
        Ok(())
    }

    /// Issue `method`, retrying once against the leader on a leader change.
    fn call<P: Payload>(&mut self, method: &str, req: MetaRequest<'_>) -> DumpResult<P> {
        let mut resp: MetaResponse<P> = self.raw_call(method, req)?;
        if resp.code == E_LEADER_CHANGED {
            self.follow_leader(&resp.leader)?;
            resp = self.raw_call(method, req)?;
        }
        if resp.code != 0 {
            return Err(DumpError::rpc(format!(
                "{} on {} failed with code {}",
                method, self.conn.address, resp.code
            )));
        }
        Ok(resp.payload)
    }

    fn raw_call<P: Payload>(
        &mut self,
        method: &str,
        req: MetaRequest<'_>,
    ) -> DumpResult<MetaResponse<P>> {
        self.seq = self.seq.wrapping_add(1);
        debug!(method, seq = self.seq, address = %self.conn.address, "meta rpc");
        meta_service_call(
            &mut self.conn.input,
            &mut self.conn.output,
            method,
            self.seq,
            req,
        )
        .map_err(|e| DumpError::rpc(format!("{} on {}: {}", method, self.conn.address, e)))
    }
}
