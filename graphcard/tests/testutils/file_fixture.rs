//! Statistics and label distribution files in a temporary directory

use std::fs;
use std::path::{Path, PathBuf};

/// 100 nodes: Person (0, 60), Employee (1, 20, all persons), City (2, 40).
/// 300 KNOWS (0) between persons, 60 LIVES_IN (1) from persons to cities.
/// Person names: 50 distinct, "Alice" on 10% of persons.
pub const STATISTICS: &str = "# Nodes
100
# Node Labels
3
Person\t0\t60
Employee\t1\t20
City\t2\t40
# Edge Types
2
KNOWS\t0\t300\t300\t300\t300
LIVES_IN\t1\t60\t60\t60\t60
# Node Properties
1
name\t0
# Label/Type Combinations
14
0\t0\t0\t300
0\t0\t-1\t300
-1\t0\t0\t300
-1\t0\t-1\t300
0\t-1\t0\t300
-1\t-1\t0\t300
0\t1\t2\t60
0\t1\t-1\t60
-1\t1\t2\t60
-1\t1\t-1\t60
0\t-1\t2\t60
-1\t-1\t2\t60
0\t-1\t-1\t360
-1\t-1\t-1\t360
# Type/Type Combinations
0
# Label/Property Combinations
1
0\t0\t60\t50\t0\t1\t3c6a660=0.1
# Type/Property Combinations
0
";

pub const SUBLABELS: &str = "label,subLabel\nPerson,Employee\n";

pub const PARTITION: &str = "groupId,label\n0,Person\n0,Employee\n1,City\n";

/// Temporary directory holding `stats.txt` and the label CSV files
pub struct FileFixture {
    dir: tempfile::TempDir,
}

impl FileFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let fixture = Self {
            dir: tempfile::tempdir()?,
        };
        fixture.write("stats.txt", STATISTICS)?;
        fixture.write("sublabelMap.csv", SUBLABELS)?;
        fixture.write("labelPartition.csv", PARTITION)?;
        Ok(fixture)
    }

    /// Replaces a file of the fixture
    pub fn write(&self, name: &str, contents: &str) -> std::io::Result<()> {
        fs::write(self.dir.path().join(name), contents)
    }

    pub fn statistics_path(&self) -> PathBuf {
        self.dir.path().join("stats.txt")
    }

    pub fn labels_dir(&self) -> &Path {
        self.dir.path()
    }
}
