//! Sqlite-backed [`GraphRepository`]: three tables (`nodes`, `edges`,
//! `graphs`), schemas and key maps stored as `facet_json`-encoded text
//! columns. Persistence is treated as a narrow, external collaborator —
//! no normalization beyond what the repository interface needs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use graph_types::{Edge, EdgeId, Graph, GraphId, Node, NodeId, TypeTag};
use rusqlite::{Connection, OptionalExtension, params};

/// Thin connection handle, mirroring the split between holding a path and
/// opening per-operation connections used throughout this workspace.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<Connection, String> {
        Connection::open(&self.path).map_err(|error| format!("open sqlite: {error}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound,
    Backend(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::NotFound => write!(f, "not found"),
            RepoError::Backend(error) => write!(f, "storage error: {error}"),
        }
    }
}

impl std::error::Error for RepoError {}

pub trait GraphRepository {
    fn load_node(&self, node_id: &NodeId) -> Result<Option<Node>, RepoError>;
    fn load_edges(&self) -> Result<Vec<Edge>, RepoError>;
    fn load_graph(&self, graph_id: &GraphId) -> Result<Option<Graph>, RepoError>;
    fn save_node(&self, node: &Node) -> Result<(), RepoError>;
    fn save_edge(&self, edge: &Edge) -> Result<(), RepoError>;
    fn save_graph(&self, graph: &Graph) -> Result<(), RepoError>;
}

pub struct SqliteGraphRepository {
    db: Db,
}

impl SqliteGraphRepository {
    /// Opens (creating if absent) the sqlite file at `path` and ensures the
    /// schema exists.
    pub fn open(path: PathBuf) -> Result<Self, RepoError> {
        let db = Db::new(path);
        let conn = db.open().map_err(RepoError::Backend)?;
        init_schema(&conn).map_err(|error| RepoError::Backend(error.to_string()))?;
        Ok(Self { db })
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS nodes (
            node_id         TEXT NOT NULL PRIMARY KEY,
            data_in_schema  TEXT NOT NULL,
            data_out_schema TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS edges (
            edge_id  TEXT NOT NULL PRIMARY KEY,
            src_node TEXT NOT NULL,
            dst_node TEXT NOT NULL,
            key_map  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS graphs (
            graph_id TEXT NOT NULL PRIMARY KEY,
            node_ids TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_edges_src ON edges(src_node);
        CREATE INDEX IF NOT EXISTS idx_edges_dst ON edges(dst_node);
        ",
    )
}

fn encode<T>(value: &T) -> Result<String, RepoError>
where
    T: for<'facet> facet::Facet<'facet>,
{
    facet_json::to_string(value).map_err(|error| RepoError::Backend(format!("encode json: {error}")))
}

fn decode<T>(text: &str) -> Result<T, RepoError>
where
    T: for<'facet> facet::Facet<'facet>,
{
    facet_json::from_str(text).map_err(|error| RepoError::Backend(format!("decode json: {error}")))
}

impl GraphRepository for SqliteGraphRepository {
    fn load_node(&self, node_id: &NodeId) -> Result<Option<Node>, RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let row = conn
            .query_row(
                "SELECT data_in_schema, data_out_schema FROM nodes WHERE node_id = ?1",
                params![node_id.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|error| RepoError::Backend(error.to_string()))?;

        let Some((in_schema_json, out_schema_json)) = row else {
            return Ok(None);
        };

        let data_in_schema: BTreeMap<String, TypeTag> = decode(&in_schema_json)?;
        let data_out_schema: BTreeMap<String, TypeTag> = decode(&out_schema_json)?;
        Ok(Some(Node::new(node_id.clone(), data_in_schema, data_out_schema)))
    }

    fn load_edges(&self) -> Result<Vec<Edge>, RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let mut stmt = conn
            .prepare("SELECT edge_id, src_node, dst_node, key_map FROM edges")
            .map_err(|error| RepoError::Backend(error.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|error| RepoError::Backend(error.to_string()))?;

        let mut edges = Vec::new();
        for row in rows {
            let (edge_id, src_node, dst_node, key_map_json) =
                row.map_err(|error| RepoError::Backend(error.to_string()))?;
            let key_map: BTreeMap<String, String> = decode(&key_map_json)?;
            edges.push(Edge {
                edge_id: EdgeId::new(edge_id),
                src_node: NodeId::new(src_node),
                dst_node: NodeId::new(dst_node),
                key_map,
            });
        }
        Ok(edges)
    }

    fn load_graph(&self, graph_id: &GraphId) -> Result<Option<Graph>, RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let row = conn
            .query_row(
                "SELECT node_ids FROM graphs WHERE graph_id = ?1",
                params![graph_id.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| RepoError::Backend(error.to_string()))?;

        let Some(node_ids_json) = row else {
            return Ok(None);
        };
        let node_ids: BTreeSet<NodeId> = decode(&node_ids_json)?;
        Ok(Some(Graph { graph_id: graph_id.clone(), nodes: node_ids }))
    }

    fn save_node(&self, node: &Node) -> Result<(), RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let in_schema_json = encode(&node.data_in_schema)?;
        let out_schema_json = encode(&node.data_out_schema)?;
        conn.execute(
            "INSERT INTO nodes (node_id, data_in_schema, data_out_schema)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(node_id) DO UPDATE SET
               data_in_schema = excluded.data_in_schema,
               data_out_schema = excluded.data_out_schema",
            params![node.node_id.as_str(), in_schema_json, out_schema_json],
        )
        .map_err(|error| RepoError::Backend(error.to_string()))?;
        Ok(())
    }

    fn save_edge(&self, edge: &Edge) -> Result<(), RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let key_map_json = encode(&edge.key_map)?;
        conn.execute(
            "INSERT INTO edges (edge_id, src_node, dst_node, key_map)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(edge_id) DO UPDATE SET
               src_node = excluded.src_node,
               dst_node = excluded.dst_node,
               key_map = excluded.key_map",
            params![edge.edge_id.as_str(), edge.src_node.as_str(), edge.dst_node.as_str(), key_map_json],
        )
        .map_err(|error| RepoError::Backend(error.to_string()))?;
        Ok(())
    }

    fn save_graph(&self, graph: &Graph) -> Result<(), RepoError> {
        let conn = self.db.open().map_err(RepoError::Backend)?;
        let node_ids_json = encode(&graph.nodes)?;
        conn.execute(
            "INSERT INTO graphs (graph_id, node_ids)
             VALUES (?1, ?2)
             ON CONFLICT(graph_id) DO UPDATE SET node_ids = excluded.node_ids",
            params![graph.graph_id.as_str(), node_ids_json],
        )
        .map_err(|error| RepoError::Backend(error.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn temp_repo() -> SqliteGraphRepository {
        let mut path = std::env::temp_dir();
        path.push(format!("graph-engine-test-{}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);
        SqliteGraphRepository::open(path).expect("open temp repo")
    }

    #[test]
    fn round_trips_a_node() {
        let repo = temp_repo();
        let node = Node::new(
            NodeId::new("a"),
            Map::from([("x".to_string(), TypeTag::Int)]),
            Map::new(),
        );
        repo.save_node(&node).unwrap();
        let loaded = repo.load_node(&NodeId::new("a")).unwrap().unwrap();
        assert_eq!(loaded.data_in_schema, node.data_in_schema);
        assert_eq!(loaded.data_out_schema, node.data_out_schema);
    }

    #[test]
    fn missing_node_is_none() {
        let repo = temp_repo();
        assert!(repo.load_node(&NodeId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn round_trips_an_edge_and_a_graph() {
        let repo = temp_repo();
        let edge = Edge {
            edge_id: EdgeId::new("e1"),
            src_node: NodeId::new("a"),
            dst_node: NodeId::new("b"),
            key_map: Map::from([("x".to_string(), "x".to_string())]),
        };
        repo.save_edge(&edge).unwrap();
        let edges = repo.load_edges().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_id, edge.edge_id);

        let graph = Graph { graph_id: GraphId::new("g"), nodes: BTreeSet::from([NodeId::new("a"), NodeId::new("b")]) };
        repo.save_graph(&graph).unwrap();
        let loaded = repo.load_graph(&GraphId::new("g")).unwrap().unwrap();
        assert_eq!(loaded.nodes, graph.nodes);
    }
}
