use std::{
    hash::{Hash, Hasher},
    io::BufWriter,
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;

use crate::{
    distance_matrix::DistanceMatrix,
    waypoint::{RoutingProfile, Waypoint},
};

pub const CACHE_FOLDER_ENV_VAR: &str = "WAYFARER_CACHE_FOLDER";

/// Storage for full distance matrices, keyed by the waypoints and the profile.
pub trait MatrixCache {
    fn get_cached(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<Option<DistanceMatrix>, anyhow::Error>;

    fn cache(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
        matrix: &DistanceMatrix,
    ) -> Result<(), anyhow::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl MatrixCache for NoCache {
    fn get_cached(
        &self,
        _waypoints: &[Waypoint],
        _profile: RoutingProfile,
    ) -> Result<Option<DistanceMatrix>, anyhow::Error> {
        Ok(None)
    }

    fn cache(
        &self,
        _waypoints: &[Waypoint],
        _profile: RoutingProfile,
        _matrix: &DistanceMatrix,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

impl<C> MatrixCache for Option<C>
where
    C: MatrixCache,
{
    fn get_cached(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<Option<DistanceMatrix>, anyhow::Error> {
        match self {
            Some(cache) => cache.get_cached(waypoints, profile),
            None => Ok(None),
        }
    }

    fn cache(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
        matrix: &DistanceMatrix,
    ) -> Result<(), anyhow::Error> {
        match self {
            Some(cache) => cache.cache(waypoints, profile, matrix),
            None => Ok(()),
        }
    }
}

/// JSON files in a folder, one per waypoint set and profile.
#[derive(Debug, Clone)]
pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let folder = folder.into();

        if !folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                folder.display()
            ));
        }

        Ok(Self { folder })
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let folder = std::env::var(CACHE_FOLDER_ENV_VAR)?;
        Self::new(folder)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn file_path(&self, waypoints: &[Waypoint], profile: RoutingProfile) -> PathBuf {
        self.folder.join(get_filename(waypoints, profile))
    }
}

impl MatrixCache for FileCache {
    fn get_cached(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
    ) -> Result<Option<DistanceMatrix>, anyhow::Error> {
        let file_path = self.file_path(waypoints, profile);

        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let matrix: DistanceMatrix = serde_json::from_reader(file)?;

        Ok(Some(matrix))
    }

    fn cache(
        &self,
        waypoints: &[Waypoint],
        profile: RoutingProfile,
        matrix: &DistanceMatrix,
    ) -> Result<(), anyhow::Error> {
        // Written next to its final path and renamed, readers never see a partial file
        let file = tempfile::NamedTempFile::new_in(&self.folder)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, matrix)?;

        let file = writer.into_inner().map_err(|error| error.into_error())?;
        file.persist(self.file_path(waypoints, profile))?;

        Ok(())
    }
}

fn hash_waypoints<H>(waypoints: &[Waypoint], hasher: &mut H)
where
    H: Hasher,
{
    waypoints.len().hash(hasher);
    for waypoint in waypoints {
        waypoint.id.hash(hasher);
        hasher.write_u64(waypoint.lon().to_bits());
        hasher.write_u64(waypoint.lat().to_bits());
    }
}

fn get_filename(waypoints: &[Waypoint], profile: RoutingProfile) -> String {
    let mut hasher = FxHasher64::default();

    hash_waypoints(waypoints, &mut hasher);
    profile.hash(&mut hasher);

    format!("{:016x}.json", hasher.finish())
}
