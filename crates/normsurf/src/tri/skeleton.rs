//! Skeleton of a gluing table: triangles, edges, vertices, boundary components.
//!
//! Everything is derived once from the gluing table; nothing here is cached
//! lazily. Vertex links are described only through the data the enumeration
//! engine needs (Euler characteristic, orientability, closed or not).

use std::collections::{BTreeSet, HashSet};

use super::perm::{edge_number, edge_ordering, face_ordering, Perm4};
use super::{Gluing, TetGluings};

/// One side of a triangle: `perm[3]` is the face number inside `tet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceEmbedding {
    pub tet: usize,
    pub perm: Perm4,
}

/// One appearance of an edge: `perm[0]`, `perm[1]` are its endpoints inside `tet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEmbedding {
    pub tet: usize,
    pub perm: Perm4,
}

#[derive(Clone, Debug)]
pub struct Triangle {
    /// One embedding for boundary triangles, two otherwise.
    pub embeddings: Vec<FaceEmbedding>,
}

impl Triangle {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.embeddings.len() == 1
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    /// Embeddings in walking order; for boundary edges the walk starts and
    /// ends on boundary triangles.
    pub embeddings: Vec<EdgeEmbedding>,
    pub boundary: bool,
    /// False if the edge is identified with itself in reverse.
    pub valid: bool,
}

impl Edge {
    #[inline]
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    /// (tetrahedron, corner) pairs making up this vertex.
    pub corners: Vec<(usize, usize)>,
    pub link_euler: i64,
    pub link_orientable: bool,
    /// Link has no boundary (vertex not on a boundary triangle).
    pub link_closed: bool,
}

impl Vertex {
    /// Closed link that is not a sphere.
    #[inline]
    pub fn is_ideal(&self) -> bool {
        self.link_closed && self.link_euler != 2
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.link_closed
    }
}

/// A real boundary surface (made of boundary triangles) or an ideal vertex link.
#[derive(Clone, Debug)]
pub struct BoundaryComponent {
    pub triangles: Vec<usize>,
    pub edges: Vec<usize>,
    pub vertices: Vec<usize>,
    pub ideal: bool,
    pub orientable: bool,
    pub euler: i64,
}

#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    pub triangles: Vec<Triangle>,
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
    pub boundary_components: Vec<BoundaryComponent>,
    pub tet_triangles: Vec<[usize; 4]>,
    pub tet_edges: Vec<[usize; 6]>,
    pub tet_vertices: Vec<[usize; 4]>,
    pub orientable: bool,
    pub components: usize,
}

/// Cross the face opposite `p[2]` (forward) or `p[3]` (backward): both
/// directions use the same relabelling.
#[inline]
fn step(g: &Gluing, p: Perm4) -> Perm4 {
    let img = [
        g.perm[p.at(0)],
        g.perm[p.at(1)],
        g.perm[p.at(3)],
        g.perm[p.at(2)],
    ];
    Perm4::new(img).unwrap_or(Perm4::IDENTITY)
}

/// Sign of the ordering (a, b, c) relative to increasing order.
#[inline]
fn parity3(a: usize, b: usize, c: usize) -> i32 {
    let inv = (a > b) as i32 + (a > c) as i32 + (b > c) as i32;
    if inv % 2 == 0 {
        1
    } else {
        -1
    }
}

struct UnionFind(Vec<usize>);

impl UnionFind {
    fn new(n: usize) -> Self {
        Self((0..n).collect())
    }
    fn find(&mut self, x: usize) -> usize {
        let mut r = x;
        while self.0[r] != r {
            r = self.0[r];
        }
        let mut y = x;
        while self.0[y] != r {
            let next = self.0[y];
            self.0[y] = r;
            y = next;
        }
        r
    }
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // keep the smaller root so class order follows first appearance
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.0[hi] = lo;
        }
    }
}

impl Skeleton {
    pub fn compute(tets: &[TetGluings]) -> Self {
        let mut sk = Skeleton {
            tet_triangles: vec![[usize::MAX; 4]; tets.len()],
            tet_edges: vec![[usize::MAX; 6]; tets.len()],
            tet_vertices: vec![[usize::MAX; 4]; tets.len()],
            ..Default::default()
        };
        sk.compute_triangles(tets);
        sk.compute_edges(tets);
        sk.compute_vertices(tets);
        sk.compute_components(tets);
        sk.compute_boundary_components();
        sk
    }

    fn compute_triangles(&mut self, tets: &[TetGluings]) {
        for t in 0..tets.len() {
            for f in 0..4 {
                if self.tet_triangles[t][f] != usize::MAX {
                    continue;
                }
                let idx = self.triangles.len();
                let p0 = face_ordering(f);
                let mut embeddings = vec![FaceEmbedding { tet: t, perm: p0 }];
                self.tet_triangles[t][f] = idx;
                if let Some(g) = &tets[t][f] {
                    let p1 = g.perm.compose(&p0);
                    embeddings.push(FaceEmbedding {
                        tet: g.adj,
                        perm: p1,
                    });
                    self.tet_triangles[g.adj][p1.at(3)] = idx;
                }
                self.triangles.push(Triangle { embeddings });
            }
        }
    }

    fn compute_edges(&mut self, tets: &[TetGluings]) {
        for t in 0..tets.len() {
            for e in 0..6 {
                if self.tet_edges[t][e] != usize::MAX {
                    continue;
                }
                let idx = self.edges.len();
                let edge = walk_edge(tets, t, edge_ordering(e));
                for emb in &edge.embeddings {
                    let num = edge_number(emb.perm.at(0), emb.perm.at(1));
                    self.tet_edges[emb.tet][num] = idx;
                }
                self.edges.push(edge);
            }
        }
    }

    fn compute_vertices(&mut self, tets: &[TetGluings]) {
        let n = tets.len();
        let mut uf = UnionFind::new(4 * n);
        for (t, row) in tets.iter().enumerate() {
            for (f, g) in row.iter().enumerate() {
                let Some(g) = g else { continue };
                for v in (0..4).filter(|&v| v != f) {
                    uf.union(4 * t + v, 4 * g.adj + g.perm.at(v));
                }
            }
        }
        let mut root_to_vertex = vec![usize::MAX; 4 * n];
        for c in 0..4 * n {
            let r = uf.find(c);
            if root_to_vertex[r] == usize::MAX {
                root_to_vertex[r] = self.vertices.len();
                self.vertices.push(Vertex {
                    corners: Vec::new(),
                    link_euler: 0,
                    link_orientable: true,
                    link_closed: true,
                });
            }
            let v = root_to_vertex[r];
            self.tet_vertices[c / 4][c % 4] = v;
            self.vertices[v].corners.push((c / 4, c % 4));
        }

        // χ(link) = (edge ends) - (triangle corners) + (tetrahedron corners).
        let mut chi: Vec<i64> = self.vertices.iter().map(|v| v.corners.len() as i64).collect();
        for tri in &self.triangles {
            let emb = tri.embeddings[0];
            for i in 0..3 {
                let v = self.tet_vertices[emb.tet][emb.perm.at(i)];
                chi[v] -= 1;
                if tri.is_boundary() {
                    self.vertices[v].link_closed = false;
                }
            }
        }
        for edge in &self.edges {
            let emb = edge.embeddings[0];
            chi[self.tet_vertices[emb.tet][emb.perm.at(0)]] += 1;
            chi[self.tet_vertices[emb.tet][emb.perm.at(1)]] += 1;
        }
        for (v, c) in self.vertices.iter_mut().zip(chi) {
            v.link_euler = c;
        }

        // Link orientability: propagate a sign over corners.
        let mut sign = vec![0i32; 4 * n];
        for start in 0..4 * n {
            if sign[start] != 0 {
                continue;
            }
            sign[start] = 1;
            let mut stack = vec![start];
            while let Some(c) = stack.pop() {
                let (t, v) = (c / 4, c % 4);
                for f in (0..4).filter(|&f| f != v) {
                    let Some(g) = &tets[t][f] else { continue };
                    let d = 4 * g.adj + g.perm.at(v);
                    let want = -g.perm.sign() * sign[c];
                    if sign[d] == 0 {
                        sign[d] = want;
                        stack.push(d);
                    } else if sign[d] != want {
                        let vtx = self.tet_vertices[t][v];
                        self.vertices[vtx].link_orientable = false;
                    }
                }
            }
        }
    }

    fn compute_components(&mut self, tets: &[TetGluings]) {
        let n = tets.len();
        let mut sign = vec![0i32; n];
        self.orientable = true;
        self.components = 0;
        for start in 0..n {
            if sign[start] != 0 {
                continue;
            }
            self.components += 1;
            sign[start] = 1;
            let mut stack = vec![start];
            while let Some(t) = stack.pop() {
                for g in tets[t].iter().flatten() {
                    let want = -g.perm.sign() * sign[t];
                    if sign[g.adj] == 0 {
                        sign[g.adj] = want;
                        stack.push(g.adj);
                    } else if sign[g.adj] != want {
                        self.orientable = false;
                    }
                }
            }
        }
    }

    fn compute_boundary_components(&mut self) {
        let boundary: Vec<usize> = (0..self.triangles.len())
            .filter(|&i| self.triangles[i].is_boundary())
            .collect();
        let mut local = vec![usize::MAX; self.triangles.len()];
        for (k, &i) in boundary.iter().enumerate() {
            local[i] = k;
        }

        // Boundary triangles sharing an edge lie in the same component; the
        // first and last embeddings of a boundary edge sit on those triangles.
        let mut uf = UnionFind::new(boundary.len());
        let mut links: Vec<(usize, usize, i32)> = Vec::new();
        for edge in self.edges.iter().filter(|e| e.boundary && e.valid) {
            let (Some(a), Some(b)) = (edge.embeddings.first(), edge.embeddings.last()) else {
                continue;
            };
            let ta = local[self.tet_triangles[a.tet][a.perm.at(3)]];
            let tb = local[self.tet_triangles[b.tet][b.perm.at(2)]];
            if ta == usize::MAX || tb == usize::MAX {
                continue;
            }
            uf.union(ta, tb);
            let pa = parity3(a.perm.at(0), a.perm.at(1), a.perm.at(2));
            let pb = parity3(b.perm.at(0), b.perm.at(1), b.perm.at(3));
            links.push((ta, tb, -pa * pb));
        }

        let mut comp_of = vec![usize::MAX; boundary.len()];
        let mut comps: Vec<Vec<usize>> = Vec::new();
        for k in 0..boundary.len() {
            let r = uf.find(k);
            if comp_of[r] == usize::MAX {
                comp_of[r] = comps.len();
                comps.push(Vec::new());
            }
            comps[comp_of[r]].push(k);
        }

        for members in comps {
            let member_set: HashSet<usize> = members.iter().copied().collect();
            let orientable = orient_triangles(&member_set, &links);
            let mut edges = BTreeSet::new();
            let mut vertices = BTreeSet::new();
            let triangles: Vec<usize> = members.iter().map(|&k| boundary[k]).collect();
            for &tri in &triangles {
                let emb = self.triangles[tri].embeddings[0];
                for i in 0..3 {
                    vertices.insert(self.tet_vertices[emb.tet][emb.perm.at(i)]);
                    for j in (i + 1)..3 {
                        let num = edge_number(emb.perm.at(i), emb.perm.at(j));
                        edges.insert(self.tet_edges[emb.tet][num]);
                    }
                }
            }
            let euler = vertices.len() as i64 - edges.len() as i64 + triangles.len() as i64;
            self.boundary_components.push(BoundaryComponent {
                triangles,
                edges: edges.into_iter().collect(),
                vertices: vertices.into_iter().collect(),
                ideal: false,
                orientable,
                euler,
            });
        }

        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.is_ideal() {
                self.boundary_components.push(BoundaryComponent {
                    triangles: Vec::new(),
                    edges: Vec::new(),
                    vertices: vec![v],
                    ideal: true,
                    orientable: vertex.link_orientable,
                    euler: vertex.link_euler,
                });
            }
        }
    }
}

/// Two-colour the boundary triangles of one component; `links` carries
/// `(a, b, s)` meaning orientation(b) = s * orientation(a).
fn orient_triangles(members: &HashSet<usize>, links: &[(usize, usize, i32)]) -> bool {
    let mut sign: std::collections::HashMap<usize, i32> = std::collections::HashMap::new();
    let relevant: Vec<&(usize, usize, i32)> =
        links.iter().filter(|(a, _, _)| members.contains(a)).collect();
    for &start in members {
        if sign.contains_key(&start) {
            continue;
        }
        sign.insert(start, 1);
        let mut stack = vec![start];
        while let Some(x) = stack.pop() {
            let sx = sign[&x];
            for &&(a, b, s) in &relevant {
                let (other, want) = if a == x {
                    (b, s * sx)
                } else if b == x {
                    (a, s * sx)
                } else {
                    continue;
                };
                match sign.get(&other) {
                    None => {
                        sign.insert(other, want);
                        stack.push(other);
                    }
                    Some(&have) if have != want => return false,
                    Some(_) => {}
                }
            }
        }
    }
    true
}

/// Walk around the edge through `(tet, p)`: find the first embedding (a
/// boundary end, or the start for internal edges), then collect forwards.
fn walk_edge(tets: &[TetGluings], tet: usize, p: Perm4) -> Edge {
    let start = (tet, p);
    let mut cur = start;
    let mut internal = false;
    loop {
        match &tets[cur.0][cur.1.at(3)] {
            None => break,
            Some(g) => {
                let next = (g.adj, step(g, cur.1));
                if next == start {
                    internal = true;
                    break;
                }
                cur = next;
            }
        }
    }
    let first = if internal { start } else { cur };

    let key = |(t, q): (usize, Perm4)| (t, edge_number(q.at(0), q.at(1)));
    let mut seen = HashSet::new();
    seen.insert(key(first));
    let mut embeddings = vec![EdgeEmbedding {
        tet: first.0,
        perm: first.1,
    }];
    let mut valid = true;
    let mut cur = first;
    loop {
        let Some(g) = &tets[cur.0][cur.1.at(2)] else {
            break;
        };
        let next = (g.adj, step(g, cur.1));
        if next == first {
            break;
        }
        if !seen.insert(key(next)) {
            valid = false;
            break;
        }
        embeddings.push(EdgeEmbedding {
            tet: next.0,
            perm: next.1,
        });
        cur = next;
    }
    Edge {
        embeddings,
        boundary: !internal,
        valid,
    }
}
