use dashmap::DashMap;

use crate::model::{Project, ProjectId, Resource, ResourceId};

/// Read-only reference data supplied by the surrounding system: who can be
/// booked, and onto what. Never mutated by booking operations.
pub struct Directory {
    resources: DashMap<ResourceId, Resource>,
    projects: DashMap<ProjectId, Project>,
}

impl Directory {
    pub fn new(resources: Vec<Resource>, projects: Vec<Project>) -> Self {
        let dir = Self {
            resources: DashMap::new(),
            projects: DashMap::new(),
        };
        for r in resources {
            dir.resources.insert(r.id, r);
        }
        for p in projects {
            dir.projects.insert(p.id, p);
        }
        dir
    }

    pub fn resource(&self, id: ResourceId) -> Option<Resource> {
        self.resources.get(&id).map(|e| e.value().clone())
    }

    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.projects.get(&id).map(|e| e.value().clone())
    }

    pub fn resources(&self) -> Vec<Resource> {
        let mut out: Vec<Resource> = self.resources.iter().map(|e| e.value().clone()).collect();
        out.sort_by_key(|r| r.id);
        out
    }

    pub fn projects(&self) -> Vec<Project> {
        let mut out: Vec<Project> = self.projects.iter().map(|e| e.value().clone()).collect();
        out.sort_by_key(|p| p.id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: ResourceId, capacity: f64) -> Resource {
        Resource {
            id,
            name: format!("r{id}"),
            role: "Engineer".into(),
            email: format!("r{id}@example.com"),
            initials: "RR".into(),
            capacity_per_day: capacity,
        }
    }

    fn project(id: ProjectId) -> Project {
        Project {
            id,
            name: format!("p{id}"),
            description: String::new(),
            client_name: "Acme".into(),
        }
    }

    #[test]
    fn lookup_by_id() {
        let dir = Directory::new(vec![resource(1, 8.0)], vec![project(10)]);
        assert_eq!(dir.resource(1).unwrap().capacity_per_day, 8.0);
        assert_eq!(dir.project(10).unwrap().client_name, "Acme");
        assert!(dir.resource(2).is_none());
        assert!(dir.project(11).is_none());
    }

    #[test]
    fn listings_sorted_by_id() {
        let dir = Directory::new(
            vec![resource(3, 8.0), resource(1, 6.0), resource(2, 8.0)],
            vec![project(12), project(10)],
        );
        let ids: Vec<ResourceId> = dir.resources().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let pids: Vec<ProjectId> = dir.projects().iter().map(|p| p.id).collect();
        assert_eq!(pids, vec![10, 12]);
    }
}
